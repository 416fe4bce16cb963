//! Declarative field rules
//!
//! Rules are plain data so a schema can be declared in configuration.
//! Each rule checks one constraint against one field value. Apart from
//! [`FieldRule::Required`], rules pass on absent fields and on values of
//! a type they do not apply to; pairing rules on a field composes the
//! constraints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

/// A single declarative validation rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    /// Field must be present and non-null
    Required,

    /// String length must be within range (inclusive)
    StringLength { min: usize, max: usize },

    /// Value must look like an email address
    Email,

    /// String must match the given regular expression
    Pattern { regex: String },

    /// Value must be one of the allowed strings
    InList { values: Vec<String> },

    /// Number must be strictly positive
    Positive,

    /// Number must not exceed the maximum
    MaxValue { max: f64 },

    /// Value must be a boolean
    Boolean,
}

impl FieldRule {
    /// Check a present field value against this rule
    ///
    /// `Required` is handled by the schema walker (it is the only rule
    /// that fires on absent fields); here it only rejects nulls.
    pub fn check(&self, field: &str, value: &Value) -> Result<(), String> {
        match self {
            FieldRule::Required => {
                if value.is_null() {
                    Err(format!("'{}' is required", field))
                } else {
                    Ok(())
                }
            }
            FieldRule::StringLength { min, max } => {
                if let Some(s) = value.as_str() {
                    let len = s.chars().count();
                    if len < *min {
                        Err(format!(
                            "'{}' must be at least {} characters (got {})",
                            field, min, len
                        ))
                    } else if len > *max {
                        Err(format!(
                            "'{}' must not exceed {} characters (got {})",
                            field, max, len
                        ))
                    } else {
                        Ok(())
                    }
                } else {
                    Ok(())
                }
            }
            FieldRule::Email => {
                if let Some(s) = value.as_str() {
                    if email_regex().is_match(s) {
                        Ok(())
                    } else {
                        Err(format!("'{}' must be a valid email address", field))
                    }
                } else {
                    Ok(())
                }
            }
            FieldRule::Pattern { regex } => {
                if let Some(s) = value.as_str() {
                    let re = Regex::new(regex)
                        .map_err(|_| format!("'{}' has an invalid pattern rule", field))?;
                    if re.is_match(s) {
                        Ok(())
                    } else {
                        Err(format!("'{}' must match pattern {}", field, regex))
                    }
                } else {
                    Ok(())
                }
            }
            FieldRule::InList { values } => {
                if let Some(s) = value.as_str() {
                    if values.iter().any(|allowed| allowed == s) {
                        Ok(())
                    } else {
                        Err(format!(
                            "'{}' must be one of {:?} (got '{}')",
                            field, values, s
                        ))
                    }
                } else {
                    Ok(())
                }
            }
            FieldRule::Positive => {
                if let Some(num) = value.as_f64() {
                    if num <= 0.0 {
                        Err(format!("'{}' must be positive (got {})", field, num))
                    } else {
                        Ok(())
                    }
                } else {
                    Ok(())
                }
            }
            FieldRule::MaxValue { max } => {
                if let Some(num) = value.as_f64() {
                    if num > *max {
                        Err(format!("'{}' must not exceed {} (got {})", field, max, num))
                    } else {
                        Ok(())
                    }
                } else {
                    Ok(())
                }
            }
            FieldRule::Boolean => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(format!("'{}' must be a boolean", field))
                }
            }
        }
    }
}

fn email_regex() -> &'static Regex {
    // Pragmatic address shape, not RFC 5322.
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}
