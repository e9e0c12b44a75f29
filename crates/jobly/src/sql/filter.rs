use super::coerce::{contains_pattern, integer_threshold, is_truthy, non_empty_text};
use super::fragment::{Fragment, FragmentWriter};
use crate::error::{JoblyError, JoblyResult};
use crate::value::SqlValue;

/// Raw, caller-supplied search filters: filter key to unparsed value.
pub type Filters = serde_json::Map<String, serde_json::Value>;

/// Fixed parameter bound by a [`FilterKind::PresenceBool`] predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
}

impl From<Literal> for SqlValue {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::Int(i) => SqlValue::Int(i),
            Literal::Bool(b) => SqlValue::Bool(b),
        }
    }
}

/// How a filter compares its column against the supplied value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// `LOWER(column) LIKE '%value%'`; needs a non-empty string.
    PartialCiMatch,
    /// `column >= value`; needs a number within the `integer` range, truncated.
    GteNumeric,
    /// `column <= value`; needs a number within the `integer` range, truncated.
    LteNumeric,
    /// `column <operator> <literal>`, included only when the value is truthy.
    PresenceBool {
        operator: &'static str,
        literal: Literal,
    },
}

/// One row of a [`FilterSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDef {
    /// Key looked up in the caller's [`Filters`].
    pub key: &'static str,
    /// Trusted column expression; never caller-supplied.
    pub column: &'static str,
    pub kind: FilterKind,
}

impl FilterDef {
    pub const fn partial_ci(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            kind: FilterKind::PartialCiMatch,
        }
    }

    pub const fn gte(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            kind: FilterKind::GteNumeric,
        }
    }

    pub const fn lte(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            kind: FilterKind::LteNumeric,
        }
    }

    pub const fn presence(
        key: &'static str,
        column: &'static str,
        operator: &'static str,
        literal: Literal,
    ) -> Self {
        Self {
            key,
            column,
            kind: FilterKind::PresenceBool { operator, literal },
        }
    }

    /// Render this filter for `value`, or do nothing if the value doesn't qualify.
    fn apply(&self, value: &serde_json::Value, w: &mut FragmentWriter) {
        let (prefix, param) = match self.kind {
            FilterKind::PartialCiMatch => match non_empty_text(value) {
                Some(s) => (
                    format!("LOWER({}) LIKE ", self.column),
                    SqlValue::Text(contains_pattern(s)),
                ),
                None => return,
            },
            FilterKind::GteNumeric => match integer_threshold(value) {
                Some(n) => (
                    format!("{} >= ", self.column),
                    SqlValue::Text(n.to_string()),
                ),
                None => return,
            },
            FilterKind::LteNumeric => match integer_threshold(value) {
                Some(n) => (
                    format!("{} <= ", self.column),
                    SqlValue::Text(n.to_string()),
                ),
                None => return,
            },
            FilterKind::PresenceBool { operator, literal } => {
                if !is_truthy(value) {
                    return;
                }
                (format!("{} {} ", self.column, operator), literal.into())
            }
        };
        w.separate(" AND ");
        w.push(&prefix).push_bind(param);
    }
}

/// The ordered set of filters an entity's search recognizes.
///
/// Clause order in the composed `WHERE` follows this table, not the order
/// in which the caller supplied filters. Adding a filter means adding a row:
///
/// ```ignore
/// pub const JOB_FILTERS: FilterSpec = FilterSpec {
///     filters: &[
///         FilterDef::partial_ci("title", "title"),
///         FilterDef::gte("minSalary", "salary"),
///         FilterDef::presence("hasEquity", "equity", ">", Literal::Int(0)),
///     ],
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub filters: &'static [FilterDef],
}

impl FilterSpec {
    pub fn get(&self, key: &str) -> Option<&FilterDef> {
        self.filters.iter().find(|f| f.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.filters.iter().map(|f| f.key)
    }
}

/// Compose an AND-joined `WHERE` body from optional search filters.
///
/// Absent, null, empty, or malformed values are skipped: no clause and no
/// parameter. This never fails; at worst the result is empty, in which case
/// the caller must omit `WHERE` (see [`Fragment::where_clause`]). Keys not in
/// `spec` are ignored.
///
/// # Example
/// ```ignore
/// let filters = json!({"title": "j2", "minSalary": 20, "hasEquity": true});
/// let w = compose_filters(filters.as_object().unwrap(), &JOB_FILTERS);
/// assert_eq!(w.text(), "LOWER(title) LIKE $1 AND salary >= $2 AND equity > $3");
/// ```
pub fn compose_filters(filters: &Filters, spec: &FilterSpec) -> Fragment {
    compose_filters_at(filters, spec, 0)
}

/// Like [`compose_filters`], numbering placeholders from `$offset+1`.
pub fn compose_filters_at(filters: &Filters, spec: &FilterSpec, offset: usize) -> Fragment {
    let mut w = FragmentWriter::new(offset);
    for def in spec.filters {
        if let Some(value) = filters.get(def.key) {
            def.apply(value, &mut w);
        }
    }
    w.finish()
}

/// Build [`Filters`] from raw query-string pairs, keeping values unparsed.
///
/// Later duplicates of a key win.
pub fn filters_from_query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Filters {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect()
}

/// Reject a lower bound that exceeds an upper bound.
///
/// Runs before composing and compares the same truncated integers the
/// composer binds; bounds the composer would skip are not compared.
pub fn check_range(filters: &Filters, min_key: &str, max_key: &str) -> JoblyResult<()> {
    let bound = |key: &str| filters.get(key).and_then(integer_threshold);
    match (bound(min_key), bound(max_key)) {
        (Some(min), Some(max)) if min > max => Err(JoblyError::validation(format!(
            "{min_key} cannot be greater than {max_key}"
        ))),
        _ => Ok(()),
    }
}
