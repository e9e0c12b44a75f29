//! Tolerant coercion of raw filter input.
//!
//! Filter values usually arrive as unparsed query-string text. None of these
//! helpers fail: input that cannot be used yields `None` / `false` and the
//! filter is treated as absent.

use serde_json::Value;

/// A non-empty string.
pub fn non_empty_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// A finite number, from a JSON number or numeric text.
///
/// `0` is a number like any other; only non-numeric, empty, or non-finite
/// input yields `None`.
pub fn finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Whether a presence flag is set.
///
/// True for `true`, any non-zero number, and the strings `"true"` / `"1"`
/// (case-insensitive). Everything else, including `"false"`, is false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        _ => false,
    }
}

/// An integer threshold for an `integer` column.
///
/// Fractions are truncated toward zero (`"2.5"` gives `2`, `"-2.5"` gives
/// `-2`). Values outside the `i32` range yield `None`, so the filter is
/// skipped instead of failing at bind time.
pub fn integer_threshold(value: &Value) -> Option<i32> {
    let n = finite_number(value)?.trunc();
    (n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX)).then_some(n as i32)
}

/// A lowercase `LIKE` pattern matching `needle` as a literal substring.
///
/// `\`, `%` and `_` are escaped with `\` (the Postgres default escape).
pub fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}
