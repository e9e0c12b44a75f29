//! Safe SQL identifier handling.
//!
//! Column names in partial updates come from caller-supplied keys, and
//! Postgres cannot parameterize identifiers. [`Ident`] renders a column as a
//! double-quoted identifier with `"` escaped as `""`, so no key can escape
//! its quotes.
//!
//! # Example
//! ```ignore
//! use jobly::Ident;
//!
//! let c = Ident::quoted("num_employees")?;
//! assert_eq!(c.to_sql(), r#""num_employees""#);
//! # Ok::<(), jobly::JoblyError>(())
//! ```

use crate::error::{JoblyError, JoblyResult};

/// A single quoted SQL identifier (column or table name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(String);

impl Ident {
    /// Create a quoted identifier.
    ///
    /// Rejects empty names and names containing NUL; everything else is
    /// representable once quoted.
    pub fn quoted(name: &str) -> JoblyResult<Self> {
        if name.is_empty() {
            return Err(JoblyError::validation("Empty column name"));
        }
        if name.contains('\0') {
            return Err(JoblyError::validation(
                "Column name cannot contain NUL character",
            ));
        }
        Ok(Self(name.to_string()))
    }

    /// The unquoted name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('"');
        for ch in self.0.chars() {
            if ch == '"' {
                out.push('"');
                out.push('"');
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}
