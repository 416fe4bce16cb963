//! In-memory implementation of DocumentStore for testing and development

use crate::core::document::{matches_filter, Document, ID_FIELD};
use crate::core::store::DocumentStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredDocument {
    /// Monotonic insertion sequence, used for stable listing order
    seq: u64,
    body: Document,
}

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    docs: HashMap<Uuid, StoredDocument>,
}

/// In-memory document store
///
/// Useful for testing and development. Uses RwLock for thread-safe
/// access; `find` returns documents in ascending insertion order.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, collection: &str, mut doc: Document) -> Result<Document> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let coll = collections.entry(collection.to_string()).or_default();
        let id = Uuid::new_v4();
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let seq = coll.next_seq;
        coll.next_seq += 1;
        coll.docs.insert(
            id,
            StoredDocument {
                seq,
                body: doc.clone(),
            },
        );

        tracing::debug!(collection = %collection, id = %id, "document inserted");
        Ok(doc)
    }

    async fn find_by_id(&self, collection: &str, id: &Uuid) -> Result<Option<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(collections
            .get(collection)
            .and_then(|coll| coll.docs.get(id))
            .map(|stored| stored.body.clone()))
    }

    async fn find(&self, collection: &str, filter: &Map<String, Value>) -> Result<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matching: Vec<&StoredDocument> = collections
            .get(collection)
            .map(|coll| {
                coll.docs
                    .values()
                    .filter(|stored| matches_filter(&stored.body, filter))
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by_key(|stored| stored.seq);
        Ok(matching.into_iter().map(|stored| stored.body.clone()).collect())
    }

    async fn apply_set(
        &self,
        collection: &str,
        id: &Uuid,
        changes: Map<String, Value>,
    ) -> Result<bool> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(stored) = collections
            .get_mut(collection)
            .and_then(|coll| coll.docs.get_mut(id))
        else {
            return Ok(false);
        };

        for (key, value) in changes {
            stored.body.insert(key, value);
        }

        tracing::debug!(collection = %collection, id = %id, "document updated");
        Ok(true)
    }

    async fn remove(&self, collection: &str, id: &Uuid) -> Result<bool> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let removed = collections
            .get_mut(collection)
            .and_then(|coll| coll.docs.remove(id))
            .is_some();

        if removed {
            tracing::debug!(collection = %collection, id = %id, "document removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::document_id;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert("notes", doc(json!({"title": "first"})))
            .await
            .unwrap();

        let id = inserted[ID_FIELD].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(inserted["title"], json!("first"));
    }

    #[tokio::test]
    async fn test_find_by_id_roundtrip() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert("notes", doc(json!({"title": "first"})))
            .await
            .unwrap();
        let id = document_id(&inserted).unwrap();

        let fetched = store.find_by_id("notes", &id).await.unwrap().unwrap();
        assert_eq!(fetched, inserted);

        assert!(store
            .find_by_id("notes", &Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_respects_insertion_order() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .insert("notes", doc(json!({"n": i})))
                .await
                .unwrap();
        }

        let all = store.find("notes", &Map::new()).await.unwrap();
        let order: Vec<i64> = all.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_find_equality_filter() {
        let store = InMemoryStore::new();
        store
            .insert("notes", doc(json!({"status": "open"})))
            .await
            .unwrap();
        store
            .insert("notes", doc(json!({"status": "done"})))
            .await
            .unwrap();

        let filter = doc(json!({"status": "open"}));
        let open = store.find("notes", &filter).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0]["status"], json!("open"));
    }

    #[tokio::test]
    async fn test_apply_set_merges_fields() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert("notes", doc(json!({"title": "first", "status": "open"})))
            .await
            .unwrap();
        let id = document_id(&inserted).unwrap();

        let changed = store
            .apply_set("notes", &id, doc(json!({"status": "done"})))
            .await
            .unwrap();
        assert!(changed);

        let fetched = store.find_by_id("notes", &id).await.unwrap().unwrap();
        assert_eq!(fetched["status"], json!("done"));
        assert_eq!(fetched["title"], json!("first"));
    }

    #[tokio::test]
    async fn test_apply_set_missing_document() {
        let store = InMemoryStore::new();
        let changed = store
            .apply_set("notes", &Uuid::new_v4(), doc(json!({"x": 1})))
            .await
            .unwrap();
        assert!(!changed);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert("notes", doc(json!({"title": "bye"})))
            .await
            .unwrap();
        let id = document_id(&inserted).unwrap();

        assert!(store.remove("notes", &id).await.unwrap());
        assert!(store.find_by_id("notes", &id).await.unwrap().is_none());
        assert!(!store.remove("notes", &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryStore::new();
        store
            .insert("notes", doc(json!({"title": "a"})))
            .await
            .unwrap();

        let other = store.find("todos", &Map::new()).await.unwrap();
        assert!(other.is_empty());
    }
}
