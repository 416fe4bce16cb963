//! Core module containing the decision engine and the seams to
//! external collaborators

pub mod auth;
pub mod document;
pub mod error;
pub mod hasher;
pub mod projection;
pub mod store;
pub mod validation;

pub use auth::{authorize_operation, owns_document, scope_filter, AccessDecision, CallerIdentity};
pub use document::{document_id, parse_document_id, Document, ID_FIELD, OWNER_FIELD};
pub use error::{ConfigError, CrudError, CrudResult, FieldValidationError};
pub use hasher::{Argon2Hasher, CredentialHasher, HashError};
pub use projection::project_fields;
pub use store::DocumentStore;
pub use validation::{FieldFilter, FieldRule, FieldSpec, Schema, ValidationOptions};
