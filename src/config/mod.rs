//! Resource configuration
//!
//! One [`ResourceConfig`] per resource type, immutable after
//! construction. The shape is fully typed and validated up front:
//! a malformed configuration fails at load time, never at request
//! time.
//!
//! # Example (YAML)
//!
//! ```yaml
//! collection: users
//! create:
//!   access: admin
//!   hash_field: password
//!   timestamp_field: created
//!   defaults:
//!     access: normal
//!     activated: false
//!     uId: true
//!   schema:
//!     fields:
//!       email:
//!         rules:
//!           - rule: required
//!           - rule: email
//!       password:
//!         rules:
//!           - rule: required
//! read:
//!   blacklist: [password]
//! update:
//!   hash_field: password
//!   timestamp_field: updated
//!   schema:
//!     fields:
//!       email:
//!         rules:
//!           - rule: email
//! validation:
//!   abort_early: false
//! ```
//!
//! The owner-id slot convention: when `create.defaults` contains a
//! `uId` key (any value), authenticated creates stamp the caller's
//! subject id into that field, overriding whatever the client sent.

use crate::core::document::Document;
use crate::core::error::{ConfigError, CrudResult};
use crate::core::validation::{Schema, ValidationOptions};
use serde::{Deserialize, Serialize};

/// Configuration for an operation that carries a payload
/// (create, update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WriteOpConfig {
    /// Role required unless the caller is admin; `None` leaves the
    /// operation ungated
    pub access: Option<String>,

    /// Payload schema
    pub schema: Schema,

    /// Default field values, overlaid by the validated payload
    pub defaults: Document,

    /// Field replaced by a one-way hash before the store call
    pub hash_field: Option<String>,

    /// Field stamped with the current time (RFC 3339)
    pub timestamp_field: Option<String>,
}

/// Configuration for read operations (read_one, find_many)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReadOpConfig {
    pub access: Option<String>,

    /// Ordered list of the only fields returned to the caller
    pub whitelist: Option<Vec<String>>,

    /// Fields stripped from results
    pub blacklist: Option<Vec<String>>,
}

/// Configuration for delete
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OpConfig {
    pub access: Option<String>,
}

/// Process-wide, immutable configuration for one resource type
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResourceConfig {
    /// Store collection the resource lives in
    pub collection: String,

    pub create: WriteOpConfig,
    pub read: ReadOpConfig,
    pub update: WriteOpConfig,
    pub delete: OpConfig,

    pub validation: ValidationOptions,
}

impl ResourceConfig {
    /// Load and validate a configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> CrudResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> CrudResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on structurally invalid configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "collection".to_string(),
                context: "resource config".to_string(),
            });
        }

        for (op, cfg) in [("create", &self.create), ("update", &self.update)] {
            check_field_name(&cfg.hash_field, op, "hash_field")?;
            check_field_name(&cfg.timestamp_field, op, "timestamp_field")?;
        }

        if let Some(whitelist) = &self.read.whitelist {
            if whitelist.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "read.whitelist".to_string(),
                    message: "must list at least one field when set".to_string(),
                });
            }
            for name in whitelist {
                if name.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "read.whitelist".to_string(),
                        message: "field names must not be empty".to_string(),
                    });
                }
            }
            let mut seen = std::collections::BTreeSet::new();
            for name in whitelist {
                if !seen.insert(name) {
                    return Err(ConfigError::InvalidValue {
                        field: "read.whitelist".to_string(),
                        message: format!("duplicate field '{}'", name),
                    });
                }
            }
        }

        if let Some(blacklist) = &self.read.blacklist {
            for name in blacklist {
                if name.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "read.blacklist".to_string(),
                        message: "field names must not be empty".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn check_field_name(
    value: &Option<String>,
    op: &str,
    name: &str,
) -> Result<(), ConfigError> {
    if let Some(field) = value {
        if field.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.{}", op, name),
                message: "field name must not be empty".to_string(),
            });
        }
    }
    Ok(())
}
