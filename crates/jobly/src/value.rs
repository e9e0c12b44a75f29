//! Scalar SQL values.
//!
//! [`SqlValue`] is the parameter type of every [`Fragment`](crate::sql::Fragment)
//! and the cell type of every [`Record`](crate::Record). Partial updates and
//! search filters carry heterogeneous, caller-supplied scalars, so parameters
//! cannot be typed statically; instead a `SqlValue` adapts itself to the type
//! Postgres inferred for its placeholder when it is bound:
//!
//! - `Text("20")` bound to an `int4` column is sent as `20`
//! - `Float(0.99)` bound to a `numeric` column is sent as exactly `0.99`
//! - any non-null value bound to a text column is sent as its display form
//!
//! Conversions that would lose information (e.g. `Text("20.5")` into `int4`,
//! or `Float(1e30)` into `int8`) fail at bind time instead of being truncated
//! or saturated. Values bound to `float4` are rounded to single precision.

use crate::error::{JoblyError, JoblyResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// A single scalar value: a query parameter or a decoded cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Numeric(Decimal),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text payload, if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn to_bool_param(&self) -> Result<bool, BoxError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(0) => Ok(false),
            Self::Int(1) => Ok(true),
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" => Ok(true),
                "false" | "f" => Ok(false),
                _ => Err(mismatch(self, &Type::BOOL)),
            },
            _ => Err(mismatch(self, &Type::BOOL)),
        }
    }

    fn to_i64_param(&self, ty: &Type) -> Result<i64, BoxError> {
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        let integral = |f: f64| {
            (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
        };
        let value = match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) => integral(*f),
            Self::Numeric(d) if d.fract().is_zero() => d.to_i64(),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        };
        value.ok_or_else(|| mismatch(self, ty))
    }

    fn to_f64_param(&self, ty: &Type) -> Result<f64, BoxError> {
        let value = match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Numeric(d) => d.to_f64(),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.ok_or_else(|| mismatch(self, ty))
    }

    /// Rounds to the nearest `f32`; finite values beyond its range are rejected.
    fn to_f32_param(&self, ty: &Type) -> Result<f32, BoxError> {
        let f = self.to_f64_param(ty)?;
        if f.is_finite() && f.abs() > f64::from(f32::MAX) {
            return Err(mismatch(self, ty));
        }
        Ok(f as f32)
    }

    fn to_decimal_param(&self) -> Result<Decimal, BoxError> {
        let value = match self {
            Self::Int(i) => Some(Decimal::from(*i)),
            // Go through the shortest round-trip text form so 0.99 stays 0.99.
            Self::Float(f) if f.is_finite() => Decimal::from_str(&f.to_string()).ok(),
            Self::Numeric(d) => Some(*d),
            Self::Text(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        };
        value.ok_or_else(|| mismatch(self, &Type::NUMERIC))
    }
}

fn mismatch(value: &SqlValue, ty: &Type) -> BoxError {
    format!("cannot bind {value:?} to a parameter of type {ty}").into()
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Numeric(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        if self.is_null() {
            return Ok(IsNull::Yes);
        }

        if *ty == Type::BOOL {
            self.to_bool_param()?.to_sql(ty, out)
        } else if *ty == Type::INT2 {
            i16::try_from(self.to_i64_param(ty)?)?.to_sql(ty, out)
        } else if *ty == Type::INT4 {
            i32::try_from(self.to_i64_param(ty)?)?.to_sql(ty, out)
        } else if *ty == Type::INT8 {
            self.to_i64_param(ty)?.to_sql(ty, out)
        } else if *ty == Type::FLOAT4 {
            self.to_f32_param(ty)?.to_sql(ty, out)
        } else if *ty == Type::FLOAT8 {
            self.to_f64_param(ty)?.to_sql(ty, out)
        } else if *ty == Type::NUMERIC {
            self.to_decimal_param()?.to_sql(ty, out)
        } else if <&str as ToSql>::accepts(ty) {
            self.to_string().as_str().to_sql(ty, out)
        } else {
            Err(mismatch(self, ty))
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        Self::Numeric(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for SqlValue {
    type Error = JoblyError;

    /// Arrays and objects are rejected: only scalars can be bound.
    fn try_from(value: serde_json::Value) -> JoblyResult<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Self::Int(i)),
                None => n
                    .as_f64()
                    .map(Self::Float)
                    .ok_or_else(|| JoblyError::validation(format!("Unsupported number: {n}"))),
            },
            Value::String(s) => Ok(Self::Text(s)),
            Value::Array(_) | Value::Object(_) => Err(JoblyError::validation(
                "Only scalar values (string, number, boolean, null) are supported",
            )),
        }
    }
}
