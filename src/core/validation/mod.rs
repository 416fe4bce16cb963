//! Payload schema validation
//!
//! A [`Schema`] declares, per field, the normalization filters and the
//! rules a candidate payload must satisfy. Validation returns either the
//! normalized payload (filters applied) or itemized field errors; it
//! never mutates anything else, so handlers can run it before any store
//! call.

pub mod filters;
pub mod rules;

pub use filters::FieldFilter;
pub use rules::FieldRule;

use crate::core::document::Document;
use crate::core::error::FieldValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Options controlling how validation errors are reported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationOptions {
    /// Stop at the first error instead of itemizing all of them
    pub abort_early: bool,
}

/// Per-field validation declaration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FieldSpec {
    pub rules: Vec<FieldRule>,
    pub filters: Vec<FieldFilter>,
}

impl FieldSpec {
    /// A field that must be present and non-null
    pub fn required() -> Self {
        Self {
            rules: vec![FieldRule::Required],
            filters: Vec::new(),
        }
    }

    /// A field with no constraints
    pub fn optional() -> Self {
        Self::default()
    }

    /// Add a rule
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a normalization filter
    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, FieldRule::Required))
    }
}

/// A declarative payload schema
///
/// Fields are kept in a `BTreeMap`, so error itemization order is
/// stable (field name order, then rule order within a field).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Schema {
    pub fields: BTreeMap<String, FieldSpec>,

    /// Reject payload keys not declared in `fields`
    pub deny_unknown: bool,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Reject undeclared payload keys
    pub fn deny_unknown(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    /// Validate a candidate payload
    ///
    /// Returns the normalized payload on success, or the itemized field
    /// errors. A non-object payload fails with a single error.
    pub fn validate(
        &self,
        payload: &Value,
        options: &ValidationOptions,
    ) -> Result<Document, Vec<FieldValidationError>> {
        let Some(object) = payload.as_object() else {
            return Err(vec![FieldValidationError::new(
                "payload",
                "must be an object",
            )]);
        };

        let mut errors = Vec::new();
        let mut normalized = Document::new();

        if self.deny_unknown {
            for key in object.keys() {
                if !self.fields.contains_key(key) {
                    errors.push(FieldValidationError::new(key, "is not an allowed field"));
                    if options.abort_early {
                        return Err(errors);
                    }
                }
            }
        }

        for (field, spec) in &self.fields {
            let value = match object.get(field) {
                Some(raw) => {
                    let mut value = raw.clone();
                    for filter in &spec.filters {
                        value = filter.apply(value);
                    }
                    value
                }
                None => {
                    if spec.is_required() {
                        errors.push(FieldValidationError::new(field, format!("'{}' is required", field)));
                        if options.abort_early {
                            return Err(errors);
                        }
                    }
                    continue;
                }
            };

            for rule in &spec.rules {
                if let Err(message) = rule.check(field, &value) {
                    errors.push(FieldValidationError::new(field, message));
                    if options.abort_early {
                        return Err(errors);
                    }
                }
            }

            normalized.insert(field.clone(), value);
        }

        // Undeclared keys pass through untouched unless denied.
        for (key, value) in object {
            if !self.fields.contains_key(key) {
                normalized.insert(key.clone(), value.clone());
            }
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> Schema {
        Schema::new()
            .field(
                "email",
                FieldSpec::required()
                    .with_rule(FieldRule::Email)
                    .with_filter(FieldFilter::Trim)
                    .with_filter(FieldFilter::Lowercase),
            )
            .field(
                "password",
                FieldSpec::required().with_rule(FieldRule::StringLength { min: 1, max: 128 }),
            )
    }

    #[test]
    fn test_valid_payload_is_normalized() {
        let schema = user_schema();
        let payload = json!({"email": "  A@B.Com ", "password": "pw"});

        let normalized = schema
            .validate(&payload, &ValidationOptions::default())
            .unwrap();
        assert_eq!(normalized["email"], json!("a@b.com"));
        assert_eq!(normalized["password"], json!("pw"));
    }

    #[test]
    fn test_missing_required_fields_itemized() {
        let schema = user_schema();
        let errors = schema
            .validate(&json!({}), &ValidationOptions { abort_early: false })
            .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[1].field, "password");
    }

    #[test]
    fn test_abort_early_stops_at_first_error() {
        let schema = user_schema();
        let errors = schema
            .validate(&json!({}), &ValidationOptions { abort_early: true })
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_optional_field_absent_is_ok() {
        let schema = Schema::new().field("email", FieldSpec::optional().with_rule(FieldRule::Email));
        let normalized = schema
            .validate(&json!({}), &ValidationOptions::default())
            .unwrap();
        assert!(normalized.is_empty());
    }

    #[test]
    fn test_optional_field_present_is_checked() {
        let schema = Schema::new().field("email", FieldSpec::optional().with_rule(FieldRule::Email));
        let errors = schema
            .validate(&json!({"email": "nope"}), &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_unknown_keys_pass_through_by_default() {
        let schema = user_schema();
        let payload = json!({"email": "a@b.com", "password": "pw", "nickname": "al"});

        let normalized = schema
            .validate(&payload, &ValidationOptions::default())
            .unwrap();
        assert_eq!(normalized["nickname"], json!("al"));
    }

    #[test]
    fn test_deny_unknown_rejects_undeclared_keys() {
        let schema = user_schema().deny_unknown();
        let payload = json!({"email": "a@b.com", "password": "pw", "nickname": "al"});

        let errors = schema
            .validate(&payload, &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(errors[0].field, "nickname");
    }

    #[test]
    fn test_non_object_payload_fails() {
        let schema = user_schema();
        let errors = schema
            .validate(&json!("just a string"), &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(errors[0].field, "payload");
    }

    #[test]
    fn test_schema_from_yaml() {
        let yaml = r#"
fields:
  email:
    rules:
      - rule: required
      - rule: email
    filters:
      - trim
      - lowercase
  access:
    rules:
      - rule: in_list
        values: [normal, admin]
deny_unknown: false
"#;
        let schema: Schema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.fields.len(), 2);
        assert!(schema.fields["email"].is_required());
    }
}
