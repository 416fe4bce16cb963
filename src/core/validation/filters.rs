//! Normalization filters
//!
//! Filters transform a field value before rules run; the validator's
//! output is the filtered (normalized) payload. Non-string values pass
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A declarative normalization filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldFilter {
    /// Trim surrounding whitespace
    Trim,

    /// Lowercase the string
    Lowercase,

    /// Uppercase the string
    Uppercase,
}

impl FieldFilter {
    /// Apply this filter to a value
    pub fn apply(&self, value: Value) -> Value {
        match value.as_str() {
            Some(s) => match self {
                FieldFilter::Trim => Value::String(s.trim().to_string()),
                FieldFilter::Lowercase => Value::String(s.to_lowercase()),
                FieldFilter::Uppercase => Value::String(s.to_uppercase()),
            },
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trim() {
        assert_eq!(FieldFilter::Trim.apply(json!("  hi  ")), json!("hi"));
        assert_eq!(FieldFilter::Trim.apply(json!("hi")), json!("hi"));
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(
            FieldFilter::Lowercase.apply(json!("A@B.Com")),
            json!("a@b.com")
        );
    }

    #[test]
    fn test_uppercase() {
        assert_eq!(FieldFilter::Uppercase.apply(json!("abc")), json!("ABC"));
    }

    #[test]
    fn test_non_string_passthrough() {
        assert_eq!(FieldFilter::Trim.apply(json!(42)), json!(42));
        assert_eq!(FieldFilter::Lowercase.apply(json!(null)), json!(null));
    }
}
