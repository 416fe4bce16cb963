//! Resource operation handlers
//!
//! A [`Resource`] bundles one [`ResourceConfig`] with the store and
//! hasher collaborators and exposes the five operations: create,
//! read_one, find_many, update, delete. Every operation evaluates the
//! same lifecycle: role gate, payload validation/defaulting, store
//! call, ownership check, field projection.
//!
//! Error paths always short-circuit before any store mutation. The
//! read-then-write sequences in update and delete are intentionally
//! non-atomic: two racing updates can both pass the ownership check and
//! both apply, last-write-wins per field. That weak-consistency policy
//! is the documented guarantee, not an oversight.

use crate::config::ResourceConfig;
use crate::core::auth::{authorize_operation, owns_document, scope_filter, CallerIdentity};
use crate::core::document::{merge, parse_document_id, Document, ID_FIELD, OWNER_FIELD};
use crate::core::error::{CrudError, CrudResult};
use crate::core::hasher::CredentialHasher;
use crate::core::projection::project_fields;
use crate::core::store::DocumentStore;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Acknowledgement body for update and delete
///
/// `error` is always null on success; the shape matches the legacy
/// surface.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub error: Option<Value>,
    pub message: String,
}

impl Ack {
    fn new(message: &str) -> Self {
        Self {
            error: None,
            message: message.to_string(),
        }
    }
}

/// Request handlers for one configured resource
#[derive(Clone)]
pub struct Resource {
    config: Arc<ResourceConfig>,
    store: Arc<dyn DocumentStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl Resource {
    /// Build handlers for a validated configuration
    pub fn new(
        config: ResourceConfig,
        store: Arc<dyn DocumentStore>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> CrudResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            store,
            hasher,
        })
    }

    /// The configuration driving these handlers
    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Create a new document
    ///
    /// Authorize, validate, merge defaults (payload wins), stamp
    /// timestamp, hash the sensitive field, stamp the owner id for
    /// authenticated callers, insert. Returns the stored document
    /// including its assigned id. Not idempotent: retries create
    /// duplicates.
    pub async fn create(
        &self,
        identity: &CallerIdentity,
        payload: &Value,
    ) -> CrudResult<Document> {
        let cfg = &self.config.create;
        self.check_access(
            identity,
            cfg.access.as_deref(),
            format!(
                "You are not permitted to insert into {}",
                self.config.collection
            ),
        )?;

        let normalized = cfg
            .schema
            .validate(payload, &self.config.validation)
            .map_err(CrudError::Validation)?;

        let mut insert = merge(&cfg.defaults, &normalized);

        if let Some(ts_field) = &cfg.timestamp_field {
            insert.insert(ts_field.clone(), Value::String(Utc::now().to_rfc3339()));
        }

        if let Some(hash_field) = &cfg.hash_field {
            self.hash_in_place(&mut insert, hash_field).await?;
        }

        // Owner stamping is opt-in via a uId slot in the defaults, and
        // client-asserted ownership is always overridden.
        if identity.is_authenticated && cfg.defaults.contains_key(OWNER_FIELD) {
            insert.insert(
                OWNER_FIELD.to_string(),
                Value::String(identity.subject_id.to_string()),
            );
        }

        tracing::debug!(collection = %self.config.collection, "creating document");
        let stored = self.store.insert(&self.config.collection, insert).await?;
        Ok(stored)
    }

    /// Fetch a single document by id, ownership-checked and projected
    pub async fn read_one(&self, identity: &CallerIdentity, id: &str) -> CrudResult<Document> {
        self.check_access(
            identity,
            self.config.read.access.as_deref(),
            "insufficient role to read".to_string(),
        )?;

        let doc_id = parse_document_id(id)?;
        let doc = self
            .store
            .find_by_id(&self.config.collection, &doc_id)
            .await?
            .ok_or_else(|| self.not_found())?;

        if !owns_document(identity, &doc) {
            tracing::warn!(
                collection = %self.config.collection,
                id = %doc_id,
                "ownership check rejected read"
            );
            return Err(CrudError::Forbidden {
                message: "not permitted to view this".to_string(),
            });
        }

        Ok(self.project(&doc))
    }

    /// List documents matching a flat equality filter, scoped to the
    /// caller and projected
    ///
    /// The ownership scope always wins on key collision: a caller
    /// cannot widen visibility by supplying `uId` in the filter. An
    /// empty result is not an error.
    pub async fn find_many(
        &self,
        identity: &CallerIdentity,
        filter: &Map<String, Value>,
    ) -> CrudResult<Vec<Document>> {
        self.check_access(
            identity,
            self.config.read.access.as_deref(),
            "insufficient role to read".to_string(),
        )?;

        let mut query = filter.clone();
        for (key, value) in scope_filter(identity) {
            query.insert(key, value);
        }

        tracing::debug!(
            collection = %self.config.collection,
            scoped = !identity.bypasses_scoping(),
            "listing documents"
        );
        let docs = self.store.find(&self.config.collection, &query).await?;
        Ok(docs.iter().map(|doc| self.project(doc)).collect())
    }

    /// Apply a partial, field-level update to an existing document
    ///
    /// Only the fields present in the payload change; all others stay
    /// untouched. The updated document is not echoed back.
    pub async fn update(
        &self,
        identity: &CallerIdentity,
        id: &str,
        payload: &Value,
    ) -> CrudResult<Ack> {
        let cfg = &self.config.update;
        self.check_access(
            identity,
            cfg.access.as_deref(),
            format!("insufficient role for update on {}", self.config.collection),
        )?;

        let mut changes = cfg
            .schema
            .validate(payload, &self.config.validation)
            .map_err(CrudError::Validation)?;

        // The id is store-assigned; a client-supplied _id would
        // desynchronize the stored body from the key it is filed under.
        changes.remove(ID_FIELD);

        if let Some(hash_field) = &cfg.hash_field {
            self.hash_in_place(&mut changes, hash_field).await?;
        }

        if let Some(ts_field) = &cfg.timestamp_field {
            changes.insert(ts_field.clone(), Value::String(Utc::now().to_rfc3339()));
        }

        let doc_id = parse_document_id(id)?;
        let existing = self
            .store
            .find_by_id(&self.config.collection, &doc_id)
            .await?
            .ok_or_else(|| self.not_found())?;

        if !owns_document(identity, &existing) {
            tracing::warn!(
                collection = %self.config.collection,
                id = %doc_id,
                "ownership check rejected update"
            );
            return Err(CrudError::Forbidden {
                message: "not permitted to update this".to_string(),
            });
        }

        tracing::debug!(collection = %self.config.collection, id = %doc_id, "updating document");
        let changed = self
            .store
            .apply_set(&self.config.collection, &doc_id, changes)
            .await?;
        if !changed {
            // Removed between the fetch and the write.
            return Err(self.not_found());
        }
        Ok(Ack::new("Updated successfully"))
    }

    /// Delete a document by id; terminal, no tombstoning
    pub async fn delete(&self, identity: &CallerIdentity, id: &str) -> CrudResult<Ack> {
        self.check_access(
            identity,
            self.config.delete.access.as_deref(),
            format!("insufficient role for delete on {}", self.config.collection),
        )?;

        let doc_id = parse_document_id(id)?;
        let existing = self
            .store
            .find_by_id(&self.config.collection, &doc_id)
            .await?
            .ok_or_else(|| self.not_found())?;

        if !owns_document(identity, &existing) {
            tracing::warn!(
                collection = %self.config.collection,
                id = %doc_id,
                "ownership check rejected delete"
            );
            return Err(CrudError::Forbidden {
                message: "not permitted to delete this".to_string(),
            });
        }

        tracing::debug!(collection = %self.config.collection, id = %doc_id, "deleting document");
        let removed = self.store.remove(&self.config.collection, &doc_id).await?;
        if !removed {
            return Err(self.not_found());
        }
        Ok(Ack::new("Deleted successfully"))
    }

    fn check_access(
        &self,
        identity: &CallerIdentity,
        required: Option<&str>,
        deny_message: String,
    ) -> CrudResult<()> {
        if authorize_operation(identity, required).is_allowed() {
            Ok(())
        } else {
            tracing::warn!(
                collection = %self.config.collection,
                role = %identity.role,
                "role gate rejected caller"
            );
            Err(CrudError::Forbidden {
                message: deny_message,
            })
        }
    }

    fn not_found(&self) -> CrudError {
        CrudError::NotFound {
            collection: self.config.collection.clone(),
        }
    }

    fn project(&self, doc: &Document) -> Document {
        project_fields(
            doc,
            self.config.read.whitelist.as_deref(),
            self.config.read.blacklist.as_deref(),
        )
    }

    /// Replace a sensitive field's value with its one-way hash
    ///
    /// Argon2 is CPU-bound, so the computation is moved off the async
    /// worker threads. Absent or non-string values are left untouched.
    async fn hash_in_place(&self, doc: &mut Document, field: &str) -> CrudResult<()> {
        let Some(plaintext) = doc.get(field).and_then(|v| v.as_str()) else {
            return Ok(());
        };

        let hasher = Arc::clone(&self.hasher);
        let plaintext = plaintext.to_string();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| CrudError::Storage {
                message: format!("hashing task failed: {}", e),
            })??;

        doc.insert(field.to_string(), Value::String(hash));
        Ok(())
    }
}
