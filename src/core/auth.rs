//! Access policy engine
//!
//! Pure decision logic, evaluated identically by every operation
//! handler. Three checks compose the policy:
//!
//! - role gating: [`authorize_operation`] compares the caller's role
//!   against the operation's required access level;
//! - list scoping: [`scope_filter`] restricts `find_many` queries to the
//!   caller's own records;
//! - ownership: [`owns_document`] is the post-fetch check used by
//!   read_one/update/delete, so that "not found" and "found but
//!   forbidden" remain distinguishable.
//!
//! Unauthenticated callers bypass all three checks. Authentication, if
//! any, is enforced by an upstream layer; an anonymous request reaching
//! this crate is treated as implicitly privileged. This mirrors the
//! legacy surface and is deliberate, documented behavior.

use crate::core::document::{Document, OWNER_FIELD};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Role value that universally bypasses ownership and role gating
pub const ADMIN_ROLE: &str = "admin";

/// Caller identity derived per request by the surrounding
/// authentication layer
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub is_authenticated: bool,
    pub role: String,
    pub subject_id: Uuid,
}

impl CallerIdentity {
    /// An authenticated caller with the given role and subject id
    pub fn authenticated(role: impl Into<String>, subject_id: Uuid) -> Self {
        Self {
            is_authenticated: true,
            role: role.into(),
            subject_id,
        }
    }

    /// An unauthenticated caller
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            role: String::new(),
            subject_id: Uuid::nil(),
        }
    }

    /// Check if the caller holds the admin role
    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.role == ADMIN_ROLE
    }

    /// True when the caller is exempt from ownership scoping
    /// (admin or unauthenticated)
    pub fn bypasses_scoping(&self) -> bool {
        !self.is_authenticated || self.is_admin()
    }
}

/// Verdict of a role-gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Decide whether the caller may perform an operation gated at
/// `required` access level
///
/// Allow when the caller is unauthenticated, is admin, the operation is
/// ungated (`required` is `None`), or the caller's role matches.
pub fn authorize_operation(identity: &CallerIdentity, required: Option<&str>) -> AccessDecision {
    if !identity.is_authenticated || identity.is_admin() {
        return AccessDecision::Allow;
    }
    match required {
        None => AccessDecision::Allow,
        Some(level) if identity.role == level => AccessDecision::Allow,
        Some(_) => AccessDecision::Deny,
    }
}

/// Equality predicate restricting a list query to the caller's records
///
/// Match-all for admin or unauthenticated callers, `{uId: subject_id}`
/// otherwise.
pub fn scope_filter(identity: &CallerIdentity) -> Map<String, Value> {
    let mut filter = Map::new();
    if !identity.bypasses_scoping() {
        filter.insert(
            OWNER_FIELD.to_string(),
            Value::String(identity.subject_id.to_string()),
        );
    }
    filter
}

/// Post-fetch ownership check
///
/// A document without an owner field is unowned and passes for any
/// caller.
pub fn owns_document(identity: &CallerIdentity, doc: &Document) -> bool {
    if identity.bypasses_scoping() {
        return true;
    }
    match doc.get(OWNER_FIELD) {
        None => true,
        Some(owner) => owner == &Value::String(identity.subject_id.to_string()),
    }
}
