//! Scalar coercions
//!
//! Each function converts one raw JSON value into a primitive, or fails with
//! `SchemaMismatch` naming the field path.

use super::types::{FieldKind, FieldPath};
use crate::error::{Error, Result};
use crate::types::{describe_value, JsonValue};
use chrono::{DateTime, Utc};

fn mismatch(path: &FieldPath, expected: &FieldKind, value: &JsonValue) -> Error {
    Error::mismatch(path.to_string(), expected.to_string(), describe_value(value))
}

/// Strings, numbers and booleans all render as text
pub fn to_string(value: &JsonValue, path: &FieldPath) -> Result<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(mismatch(path, &FieldKind::String, other)),
    }
}

/// Integral numbers and numeric strings
pub fn to_i64(value: &JsonValue, path: &FieldPath) -> Result<i64> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(path, &FieldKind::Integer, value))
}

/// `5.0` but not `5.5` or anything outside the `i64` range
fn integral(f: f64) -> Option<i64> {
    #[allow(clippy::cast_precision_loss)]
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Any JSON number and numeric strings
pub fn to_f64(value: &JsonValue, path: &FieldPath) -> Result<f64> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(path, &FieldKind::Number, value))
}

/// Booleans and the strings "true"/"false" in any case
pub fn to_bool(value: &JsonValue, path: &FieldPath) -> Result<bool> {
    match value {
        JsonValue::Bool(b) => Ok(*b),
        JsonValue::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        JsonValue::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(mismatch(path, &FieldKind::Boolean, other)),
    }
}

/// RFC 3339 timestamps, normalised to UTC
pub fn to_datetime(value: &JsonValue, path: &FieldPath) -> Result<DateTime<Utc>> {
    match value {
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| mismatch(path, &FieldKind::DateTime, value)),
        other => Err(mismatch(path, &FieldKind::DateTime, other)),
    }
}

/// Arrays whose elements all coerce to strings
pub fn to_string_list(value: &JsonValue, path: &FieldPath) -> Result<Vec<String>> {
    let JsonValue::Array(items) = value else {
        return Err(mismatch(path, &FieldKind::StringArray, value));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| to_string(item, &path.index(i)))
        .collect()
}
