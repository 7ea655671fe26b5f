// src/services/validator.rs
//! Structural checks on certificate documents.
//!
//! A field counts as present when it exists and is not `null`. Non-object
//! parents (e.g. `"recipient": "Marty"`) make their children absent.

use serde_json::Value;

fn is_set(document: &Value, pointer: &str) -> bool {
    document.pointer(pointer).map_or(false, |value| !value.is_null())
}

/// True iff `data.recipient.name` and `data.recipient.email` are both set.
pub fn validate_recipient(document: &Value) -> bool {
    is_set(document, "/data/recipient/name") && is_set(document, "/data/recipient/email")
}

/// True iff `data.issuer.name` and `data.issuer.identityProof` are both set.
pub fn validate_issuer(document: &Value) -> bool {
    is_set(document, "/data/issuer/name") && is_set(document, "/data/issuer/identityProof")
}
