use super::fragment::{Fragment, FragmentWriter};
use crate::error::{JoblyError, JoblyResult};
use crate::ident::Ident;
use crate::value::SqlValue;

/// A partial update: only the fields being changed, in insertion order.
///
/// Keys are unique; setting an existing key replaces its value in place, so
/// parameter order always follows first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: Vec<(String, SqlValue)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field (consuming version of [`Patch::insert`]).
    pub fn set(mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field, returning the previous value if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Option<SqlValue> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&SqlValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a patch from a JSON object body, keeping key order.
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        match value {
            serde_json::Value::Object(map) => Self::try_from(map),
            _ => Err(JoblyError::validation("Update data must be a JSON object")),
        }
    }

    /// Reject keys outside `allowed`.
    pub fn ensure_fields(&self, allowed: &[&str]) -> JoblyResult<()> {
        match self.keys().find(|k| !allowed.contains(k)) {
            Some(unknown) => Err(JoblyError::validation(format!(
                "Unknown field: {unknown}"
            ))),
            None => Ok(()),
        }
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Patch {
    type Error = JoblyError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> JoblyResult<Self> {
        let mut patch = Self::new();
        for (key, value) in map {
            let value = SqlValue::try_from(value)
                .map_err(|e| JoblyError::validation(format!("Field '{key}': {e}")))?;
            patch.insert(key, value);
        }
        Ok(patch)
    }
}

impl<K, V> FromIterator<(K, V)> for Patch
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut patch = Self::new();
        for (k, v) in iter {
            patch.insert(k, v);
        }
        patch
    }
}

/// Logical field name to physical column name translation.
///
/// A key without an entry is used verbatim as the column name.
#[derive(Debug, Clone, Copy)]
pub struct ColumnNames<'a> {
    pairs: &'a [(&'a str, &'a str)],
}

impl<'a> ColumnNames<'a> {
    /// No translation: every key is its own column.
    pub const IDENTITY: ColumnNames<'static> = ColumnNames { pairs: &[] };

    pub const fn new(pairs: &'a [(&'a str, &'a str)]) -> Self {
        Self { pairs }
    }

    /// Physical column for `key`.
    pub fn resolve<'k>(&self, key: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.pairs
            .iter()
            .find(|(logical, _)| *logical == key)
            .map_or(key, |(_, physical)| *physical)
    }
}

/// Build the assignment list of an `UPDATE ... SET` from a partial update.
///
/// Emits `"col1"=$1, "col2"=$2, ...` in the patch's insertion order, with the
/// patch values as parameters in the same order. Append trailing predicates
/// at [`Fragment::next_placeholder`].
///
/// # Errors
/// [`JoblyError::Validation`] with `"No data"` if the patch is empty (a `SET`
/// clause with no assignments is invalid), or if a resolved column name is
/// unusable as an identifier.
///
/// # Example
/// ```ignore
/// let patch = Patch::new().set("name", "Yelp").set("numEmployees", 1500);
/// let set = partial_update(&patch, ColumnNames::new(&[("numEmployees", "num_employees")]))?;
/// assert_eq!(set.text(), r#""name"=$1, "num_employees"=$2"#);
/// ```
pub fn partial_update(patch: &Patch, names: ColumnNames<'_>) -> JoblyResult<Fragment> {
    partial_update_at(patch, names, 0)
}

/// Like [`partial_update`], numbering placeholders from `$offset+1`.
pub fn partial_update_at(
    patch: &Patch,
    names: ColumnNames<'_>,
    offset: usize,
) -> JoblyResult<Fragment> {
    if patch.is_empty() {
        return Err(JoblyError::validation("No data"));
    }

    let mut w = FragmentWriter::new(offset);
    for (key, value) in patch.iter() {
        let column = Ident::quoted(names.resolve(key))?;
        w.separate(", ");
        column.write_sql(w.text_mut());
        w.push("=").push_bind(value.clone());
    }
    Ok(w.finish())
}
