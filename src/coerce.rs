//! Conversion of raw text input into typed JSON values.
//!
//! Inline edits use the lenient [`coerce`], which never fails: anything that is
//! not a number becomes `0`. The field form uses [`coerce_strict`], which reports
//! `InvalidNumber` instead.

use serde_json::{Map, Number, Value};

use crate::error::JsonFormError;
use crate::types::ValueKind;

/// Converts `raw` into a value of `kind`, falling back to zero for
/// non-numeric input.
///
/// ```rust
/// use jsonform::{coerce, ValueKind};
/// use serde_json::json;
///
/// assert_eq!(coerce("12", ValueKind::Number), json!(12));
/// assert_eq!(coerce("twelve", ValueKind::Number), json!(0));
/// assert_eq!(coerce("true", ValueKind::Boolean), json!(true));
/// assert_eq!(coerce("anything", ValueKind::Null), json!(null));
/// ```
pub fn coerce(raw: &str, kind: ValueKind) -> Value {
    match kind {
        ValueKind::Number => Value::Number(parse_number(raw).unwrap_or_else(|| Number::from(0))),
        _ => coerce_non_numeric(raw, kind),
    }
}

/// Like [`coerce`], but rejects input that is not a finite number.
pub fn coerce_strict(raw: &str, kind: ValueKind) -> Result<Value, JsonFormError> {
    match kind {
        ValueKind::Number => parse_number(raw)
            .map(Value::Number)
            .ok_or_else(|| JsonFormError::InvalidNumber(raw.to_string())),
        _ => Ok(coerce_non_numeric(raw, kind)),
    }
}

/// Interprets `raw` as JSON if it parses, otherwise as a plain string.
pub fn infer_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn coerce_non_numeric(raw: &str, kind: ValueKind) -> Value {
    match kind {
        ValueKind::String => Value::String(raw.to_string()),
        ValueKind::Boolean => Value::Bool(raw.trim() == "true"),
        ValueKind::Null => Value::Null,
        ValueKind::Object => Value::Object(Map::new()),
        ValueKind::Array => Value::Array(Vec::new()),
        ValueKind::Number => Value::Number(Number::from(0)),
    }
}

/// Empty input is zero; integers stay integers.
fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Number::from(0));
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(Number::from(n));
    }
    if let Ok(n) = trimmed.parse::<u64>() {
        return Some(Number::from(n));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}
