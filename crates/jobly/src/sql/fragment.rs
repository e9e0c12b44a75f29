use crate::value::SqlValue;

/// A SQL text fragment paired with its ordered parameters.
///
/// Placeholders in `text` are `$start+1 .. $start+n` where `n == params.len()`,
/// contiguous and in order. Caller values only ever live in `params`.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    text: String,
    params: Vec<SqlValue>,
    start: usize,
}

impl Fragment {
    /// An empty fragment numbering from `$1`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fragment text (no leading keyword).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The offset this fragment was numbered from (`0` means its first placeholder is `$1`).
    pub fn start(&self) -> usize {
        self.start
    }

    /// The placeholder number a caller should use for the next appended parameter.
    ///
    /// ```ignore
    /// let set = partial_update(&patch, ColumnNames::IDENTITY)?;
    /// let sql = format!("UPDATE jobs SET {} WHERE id = ${}", set.text(), set.next_placeholder());
    /// ```
    pub fn next_placeholder(&self) -> usize {
        self.start + self.params.len() + 1
    }

    /// Render as `" WHERE <text>"`, or `""` when nothing applied.
    ///
    /// An empty `WHERE` is invalid SQL, so callers should always go through this
    /// instead of prefixing the keyword themselves.
    pub fn where_clause(&self) -> String {
        if self.text.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.text)
        }
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.text, self.params)
    }
}

/// Accumulates clauses, numbering placeholders as values are bound.
pub(crate) struct FragmentWriter {
    text: String,
    params: Vec<SqlValue>,
    start: usize,
}

impl FragmentWriter {
    pub(crate) fn new(start: usize) -> Self {
        Self {
            text: String::new(),
            params: Vec::new(),
            start,
        }
    }

    pub(crate) fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Append raw SQL (no parameters).
    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        self.text.push_str(sql);
        self
    }

    /// Append `sep` unless this is the first clause.
    pub(crate) fn separate(&mut self, sep: &str) -> &mut Self {
        if !self.text.is_empty() {
            self.text.push_str(sep);
        }
        self
    }

    /// Append the next placeholder and bind its value.
    pub(crate) fn push_bind(&mut self, value: SqlValue) -> &mut Self {
        self.params.push(value);
        let idx = self.start + self.params.len();
        self.text.push('$');
        self.text.push_str(&idx.to_string());
        self
    }

    pub(crate) fn finish(self) -> Fragment {
        Fragment {
            text: self.text,
            params: self.params,
            start: self.start,
        }
    }
}
