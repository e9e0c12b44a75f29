//! Row mapping: decoded rows and typed access.

use crate::error::{JoblyError, JoblyResult};
use crate::value::SqlValue;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tokio_postgres::types::Type;

/// A decoded result row: column names paired with their values, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, SqlValue)>,
}

impl Record {
    /// Build a record from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<SqlValue>,
    {
        Self {
            columns: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Decode a `tokio_postgres` row.
    ///
    /// Supported column types: `bool`, `int2/4/8`, `float4/8`, `numeric`, and
    /// text-like types. Anything else is a decode error.
    pub fn from_row(row: &Row) -> JoblyResult<Self> {
        let mut columns = Vec::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            let name = column.name();
            let ty = column.type_();
            let decoded = if *ty == Type::BOOL {
                row.try_get::<_, Option<bool>>(idx)
                    .map(|v| v.map(SqlValue::Bool))
            } else if *ty == Type::INT2 {
                row.try_get::<_, Option<i16>>(idx)
                    .map(|v| v.map(|i| SqlValue::Int(i64::from(i))))
            } else if *ty == Type::INT4 {
                row.try_get::<_, Option<i32>>(idx)
                    .map(|v| v.map(|i| SqlValue::Int(i64::from(i))))
            } else if *ty == Type::INT8 {
                row.try_get::<_, Option<i64>>(idx)
                    .map(|v| v.map(SqlValue::Int))
            } else if *ty == Type::FLOAT4 {
                row.try_get::<_, Option<f32>>(idx)
                    .map(|v| v.map(|f| SqlValue::Float(f64::from(f))))
            } else if *ty == Type::FLOAT8 {
                row.try_get::<_, Option<f64>>(idx)
                    .map(|v| v.map(SqlValue::Float))
            } else if *ty == Type::NUMERIC {
                row.try_get::<_, Option<Decimal>>(idx)
                    .map(|v| v.map(SqlValue::Numeric))
            } else if *ty == Type::TEXT
                || *ty == Type::VARCHAR
                || *ty == Type::BPCHAR
                || *ty == Type::NAME
            {
                row.try_get::<_, Option<String>>(idx)
                    .map(|v| v.map(SqlValue::Text))
            } else {
                return Err(JoblyError::decode(
                    name,
                    format!("unsupported column type {ty}"),
                ));
            };

            let value = decoded
                .map_err(|e| JoblyError::decode(name, e.to_string()))?
                .unwrap_or(SqlValue::Null);
            columns.push((name.to_string(), value));
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Raw value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Typed value of a column, returning [`JoblyError::Decode`] on failure.
    pub fn try_get<T: FromValue>(&self, column: &str) -> JoblyResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| JoblyError::decode(column, "column not present in row"))?;
        T::from_value(value).map_err(|message| JoblyError::decode(column, message))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Trait for converting a [`Record`] into a Rust struct.
pub trait FromRecord: Sized {
    fn from_record(record: &Record) -> JoblyResult<Self>;
}

/// Typed extraction of a single [`SqlValue`].
pub trait FromValue: Sized {
    fn from_value(value: &SqlValue) -> Result<Self, String>;
}

fn unexpected(expected: &str, got: &SqlValue) -> String {
    format!("expected {expected}, got {got:?}")
}

impl FromValue for SqlValue {
    fn from_value(value: &SqlValue) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Text(s) => Ok(s.clone()),
            other => Err(unexpected("text", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Bool(b) => Ok(*b),
            other => Err(unexpected("boolean", other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Int(i) => Ok(*i),
            other => Err(unexpected("integer", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &SqlValue) -> Result<Self, String> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| format!("integer {wide} out of range for i32"))
    }
}

impl FromValue for Decimal {
    fn from_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Numeric(d) => Ok(*d),
            SqlValue::Int(i) => Ok(Decimal::from(*i)),
            other => Err(unexpected("numeric", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
