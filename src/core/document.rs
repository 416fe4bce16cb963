//! Document representation and id handling
//!
//! A document is a flat JSON object. Two field names have reserved
//! meaning across the whole crate:
//!
//! - [`ID_FIELD`] (`_id`): the store-assigned id, a UUID rendered as a
//!   string. Never client-settable; the store overwrites it on insert.
//! - [`OWNER_FIELD`] (`uId`): the subject id of the caller that created
//!   the record, used for row-level visibility scoping. A document
//!   without `uId` is unowned and visible to any caller that passes the
//!   role gate.

use crate::core::error::{CrudError, CrudResult};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored or in-flight document: a flat JSON object
pub type Document = Map<String, Value>;

/// Field holding the store-assigned document id
pub const ID_FIELD: &str = "_id";

/// Field holding the owner subject id
pub const OWNER_FIELD: &str = "uId";

/// Parse a caller-supplied id into the store's native id type
///
/// Malformed ids are a client error, reported before any store call.
pub fn parse_document_id(id: &str) -> CrudResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| CrudError::InvalidId { id: id.to_string() })
}

/// Extract the id of a stored document, if present and well-formed
pub fn document_id(doc: &Document) -> Option<Uuid> {
    doc.get(ID_FIELD)
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
}

/// Shallow-merge `overlay` onto `base`; overlay wins on key conflicts
pub fn merge(base: &Document, overlay: &Document) -> Document {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// True when every `(key, value)` pair of `filter` equals the
/// corresponding field of `doc` (flat equality match)
pub fn matches_filter(doc: &Document, filter: &Map<String, Value>) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_parse_document_id_roundtrip() {
        let id = Uuid::new_v4();
        assert_eq!(parse_document_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_document_id_malformed() {
        let err = parse_document_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, CrudError::InvalidId { .. }));
    }

    #[test]
    fn test_document_id_missing() {
        assert_eq!(document_id(&doc(json!({"email": "a@b.com"}))), None);
    }

    #[test]
    fn test_merge_overlay_wins() {
        let base = doc(json!({"access": "normal", "activated": false}));
        let overlay = doc(json!({"access": "admin", "email": "a@b.com"}));

        let merged = merge(&base, &overlay);
        assert_eq!(merged["access"], json!("admin"));
        assert_eq!(merged["activated"], json!(false));
        assert_eq!(merged["email"], json!("a@b.com"));
    }

    #[test]
    fn test_merge_does_not_mutate_base() {
        let base = doc(json!({"a": 1}));
        let overlay = doc(json!({"a": 2}));
        merge(&base, &overlay);
        assert_eq!(base["a"], json!(1));
    }

    #[test]
    fn test_matches_filter_exact_equality() {
        let d = doc(json!({"status": "active", "count": 3}));

        assert!(matches_filter(&d, &doc(json!({"status": "active"}))));
        assert!(matches_filter(&d, &doc(json!({"status": "active", "count": 3}))));
        assert!(!matches_filter(&d, &doc(json!({"status": "inactive"}))));
        assert!(!matches_filter(&d, &doc(json!({"missing": "x"}))));
    }

    #[test]
    fn test_matches_filter_empty_matches_all() {
        let d = doc(json!({"anything": true}));
        assert!(matches_filter(&d, &Map::new()));
    }
}
