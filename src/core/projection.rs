//! Field projection: whitelist/blacklist filtering applied to documents
//! before they are returned to the caller
//!
//! Projection never re-adds a field and never fabricates one: a
//! whitelisted key absent from the source document is silently omitted,
//! not inserted as null.
//!
//! When a resource configures both lists, the whitelist pass runs first
//! and the blacklist additionally strips from the whitelisted result.
//! The legacy variants disagreed on this; the two-pass rule is the
//! deterministic behavior this crate commits to.

use crate::core::document::Document;

/// Project a document through an optional whitelist and blacklist
pub fn project_fields(
    doc: &Document,
    whitelist: Option<&[String]>,
    blacklist: Option<&[String]>,
) -> Document {
    let mut projected = match whitelist {
        Some(keep) => {
            let mut out = Document::new();
            for key in keep {
                if let Some(value) = doc.get(key) {
                    out.insert(key.clone(), value.clone());
                }
            }
            out
        }
        None => doc.clone(),
    };

    if let Some(strip) = blacklist {
        for key in strip {
            projected.remove(key);
        }
    }

    projected
}
