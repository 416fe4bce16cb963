//! # crudgate
//!
//! A configuration-driven resource access layer: given a declarative
//! [`ResourceConfig`](config::ResourceConfig) (payload validation rules,
//! default field values, access-control policy, field visibility lists),
//! it produces request handlers that perform create/read/update/delete
//! operations against a document store, enforcing per-role authorization
//! and field projection on every operation.
//!
//! ## Features
//!
//! - **Role gating**: each operation can require a role; `admin` always
//!   passes, unauthenticated callers are permitted (authentication is an
//!   upstream concern)
//! - **Ownership scoping**: list queries are restricted to the caller's
//!   own records; single-document operations distinguish "not found"
//!   from "found but forbidden"
//! - **Field projection**: whitelist/blacklist filtering applied before
//!   any document is returned
//! - **Declarative schemas**: per-operation validation rules and
//!   normalization filters, loadable from YAML
//! - **Defaults, timestamps, credential hashing**: applied in a single,
//!   fixed request lifecycle before the store call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crudgate::prelude::*;
//!
//! let config = ResourceConfig::from_yaml_file("users.yaml")?;
//! let resource = Resource::new(
//!     config,
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(Argon2Hasher::new()),
//! )?;
//!
//! let admin = CallerIdentity::authenticated("admin", admin_id);
//! let created = resource
//!     .create(&admin, &json!({"email": "a@b.com", "password": "pw"}))
//!     .await?;
//! let fetched = resource.read_one(&admin, created["_id"].as_str().unwrap()).await?;
//! ```
//!
//! The HTTP layer stays outside this crate: handlers return
//! [`CrudResult`](core::error::CrudResult), and
//! [`CrudError`](core::error::CrudError) implements
//! `axum::response::IntoResponse` with the documented status mapping
//! (validation/malformed-id/absence → 400, role/ownership rejection →
//! 401, store failure → 500).

pub mod config;
pub mod core;
pub mod handlers;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Config ===
    pub use crate::config::{OpConfig, ReadOpConfig, ResourceConfig, WriteOpConfig};

    // === Core ===
    pub use crate::core::{
        auth::{authorize_operation, owns_document, scope_filter, AccessDecision, CallerIdentity},
        document::{document_id, parse_document_id, Document, ID_FIELD, OWNER_FIELD},
        error::{ConfigError, CrudError, CrudResult, FieldValidationError},
        hasher::{Argon2Hasher, CredentialHasher},
        projection::project_fields,
        store::DocumentStore,
        validation::{FieldFilter, FieldRule, FieldSpec, Schema, ValidationOptions},
    };

    // === Handlers ===
    pub use crate::handlers::{Ack, Resource};

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Map, Value};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
