//! Common types used throughout arm-pager
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// A raw record as returned by the service: a string-keyed map of JSON values
pub type Record = serde_json::Map<String, JsonValue>;

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for optional strings coming off the wire
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;

    /// Returns None if the string is empty or only whitespace
    fn none_if_blank(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }

    fn none_if_blank(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    fn none_if_blank(self) -> Option<String> {
        Some(self).none_if_blank()
    }
}

/// Short description of a JSON value's type, used in diagnostics
pub fn describe_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => format!("boolean {b}"),
        JsonValue::Number(n) => format!("number {n}"),
        JsonValue::String(s) => format!("string {s:?}"),
        JsonValue::Array(items) => format!("array of {} items", items.len()),
        JsonValue::Object(_) => "object".to_string(),
    }
}
