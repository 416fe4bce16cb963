//! Document store seam
//!
//! The resource layer talks to storage exclusively through this trait.
//! Implementations own connection handling, timeouts and retries; the
//! handlers perform no retries of their own and convert any failure
//! into a clean internal error response.

use crate::core::document::Document;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Collection-oriented document storage with equality-find, insert,
/// update-by-id and delete-by-id
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, assigning its id
    ///
    /// Returns the stored document, including the assigned `_id`.
    async fn insert(&self, collection: &str, doc: Document) -> Result<Document>;

    /// Fetch a single document by id
    async fn find_by_id(&self, collection: &str, id: &Uuid) -> Result<Option<Document>>;

    /// Find all documents matching a flat equality filter, in ascending
    /// insertion order
    async fn find(&self, collection: &str, filter: &Map<String, Value>) -> Result<Vec<Document>>;

    /// Merge the given fields into an existing document (only listed
    /// fields change, all others untouched)
    ///
    /// Returns false when no document exists for the id.
    async fn apply_set(
        &self,
        collection: &str,
        id: &Uuid,
        changes: Map<String, Value>,
    ) -> Result<bool>;

    /// Remove a document by id; returns false when absent
    async fn remove(&self, collection: &str, id: &Uuid) -> Result<bool>;
}
