//! Typed error handling for the crudgate resource layer
//!
//! Every operation handler returns [`CrudResult`], whose error side maps
//! one-to-one onto the HTTP surface an adapter is expected to expose:
//!
//! - [`CrudError::Validation`] — payload failed the declared schema → 400
//! - [`CrudError::InvalidId`] — malformed document id → 400
//! - [`CrudError::NotFound`] — no document for the id → 400 (the legacy
//!   surface reports absence as a client error, not 404; preserved)
//! - [`CrudError::Forbidden`] — role or ownership check failed → 401
//! - [`CrudError::Config`] — invalid resource configuration → 500
//! - [`CrudError::Storage`] — underlying store call failed → 500
//!
//! The body shapes match the legacy surface: 400 responses carry
//! `{"error": "Bad Request", "message": ...}` (plus itemized field errors
//! for validation failures), 401 responses carry `{"message": ...}` only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;

/// The main error type for resource operations
#[derive(Debug)]
pub enum CrudError {
    /// Payload failed schema validation
    Validation(Vec<FieldValidationError>),

    /// Document id could not be parsed into the store's native id type
    InvalidId { id: String },

    /// No document exists for the requested id
    NotFound { collection: String },

    /// Role gate or ownership check rejected the caller
    Forbidden { message: String },

    /// Resource configuration is invalid
    Config(ConfigError),

    /// The underlying document store failed
    Storage { message: String },
}

/// A single itemized field validation error
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CrudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrudError::Validation(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation failed: {}", msgs.join(", "))
            }
            CrudError::InvalidId { id } => {
                write!(f, "Invalid document id: '{}'", id)
            }
            CrudError::NotFound { collection } => {
                write!(f, "no document found in {}", collection)
            }
            CrudError::Forbidden { message } => write!(f, "{}", message),
            CrudError::Config(e) => write!(f, "{}", e),
            CrudError::Storage { message } => {
                write!(f, "Store operation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for CrudError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrudError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Error body for HTTP responses
///
/// `error` is omitted on 401 responses, which carry only a message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<FieldValidationError>>,
}

impl CrudError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrudError::Validation(_) => StatusCode::BAD_REQUEST,
            CrudError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            // Absence is surfaced as a client error, not 404.
            CrudError::NotFound { .. } => StatusCode::BAD_REQUEST,
            CrudError::Forbidden { .. } => StatusCode::UNAUTHORIZED,
            CrudError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CrudError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CrudError::Validation(_) => "VALIDATION_ERROR",
            CrudError::InvalidId { .. } => "INVALID_ID",
            CrudError::NotFound { .. } => "NOT_FOUND",
            CrudError::Forbidden { .. } => "FORBIDDEN",
            CrudError::Config(_) => "CONFIG_ERROR",
            CrudError::Storage { .. } => "STORAGE_ERROR",
        }
    }

    /// Build the response body for this error
    pub fn to_body(&self) -> ErrorBody {
        let error = match self.status_code() {
            StatusCode::BAD_REQUEST => Some("Bad Request".to_string()),
            StatusCode::UNAUTHORIZED => None,
            _ => Some("Internal Server Error".to_string()),
        };
        let validation = match self {
            CrudError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };
        ErrorBody {
            error,
            message: self.to_string(),
            validation,
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_body());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors raised while constructing or loading a resource configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse a configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A required field is missing or empty
    MissingField { field: String, context: String },

    /// A field carries an invalid value
    InvalidValue { field: String, message: String },

    /// IO error while reading a configuration file
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid value for field '{}': {}", field, message)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for CrudError {
    fn from(err: ConfigError) -> Self {
        CrudError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for CrudError {
    fn from(err: serde_yaml::Error) -> Self {
        CrudError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for CrudError {
    fn from(err: std::io::Error) -> Self {
        CrudError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

/// Storage seam failures surface as a clean 500-equivalent, never a crash
impl From<anyhow::Error> for CrudError {
    fn from(err: anyhow::Error) -> Self {
        CrudError::Storage {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for resource operations
pub type CrudResult<T> = Result<T, CrudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_collection() {
        let err = CrudError::NotFound {
            collection: "users".to_string(),
        };
        assert_eq!(err.to_string(), "no document found in users");
    }

    #[test]
    fn test_not_found_is_bad_request() {
        let err = CrudError::NotFound {
            collection: "users".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_forbidden_is_unauthorized() {
        let err = CrudError::Forbidden {
            message: "not permitted to view this".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_body_has_no_error_field() {
        let err = CrudError::Forbidden {
            message: "nope".to_string(),
        };
        let body = serde_json::to_value(err.to_body()).unwrap();
        assert!(body.get("error").is_none());
        assert_eq!(body["message"], "nope");
    }

    #[test]
    fn test_validation_body_is_itemized() {
        let err = CrudError::Validation(vec![
            FieldValidationError::new("email", "is required"),
            FieldValidationError::new("password", "is required"),
        ]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["validation"].as_array().unwrap().len(), 2);
        assert_eq!(body["validation"][0]["field"], "email");
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err: CrudError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingField {
            field: "collection".to_string(),
            context: "resource config".to_string(),
        };
        assert!(err.to_string().contains("collection"));
    }
}
