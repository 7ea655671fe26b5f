// src/models/certificate.rs
//! Certificate document views and verification verdicts.
//!
//! Certificates arrive as arbitrary JSON. Only a handful of fields are
//! interpreted; everything else under `data` participates in hashing but is
//! otherwise opaque, so the document is kept as a `serde_json::Value` and read
//! through the accessors here.
//!
//! ```text
//! { "data": { "id", "name", "issued",
//!             "recipient": { "name", "email" },
//!             "issuer": { "name", "identityProof": { "type", "key", "location" } },
//!             ... },
//!   "signature": { "type", "targetHash" } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Issuer name reported when the document carries none.
pub const UNKNOWN_ISSUER: &str = "Unknown";

/// Final verdict of a verification run.
///
/// The serialized tokens are a storage and wire contract.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified,
    InvalidRecipient,
    InvalidIssuer,
    InvalidSignature,
}

impl VerificationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationOutcome::Verified => "verified",
            VerificationOutcome::InvalidRecipient => "invalid_recipient",
            VerificationOutcome::InvalidIssuer => "invalid_issuer",
            VerificationOutcome::InvalidSignature => "invalid_signature",
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the engine hands back to the boundary layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    /// Best-known issuer name
    pub issuer: String,
    pub result: VerificationOutcome,
}

/// Borrowed view of `data.issuer.identityProof`.
///
/// Fields are optional because the structural check only guarantees that the
/// proof itself is present, not that it is well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityProof<'a> {
    /// Proof scheme, e.g. "DNS-DID"
    pub proof_type: Option<&'a str>,
    /// Expected DID, e.g. "did:ethr:0x05b6...#controller"
    pub key: Option<&'a str>,
    /// Hostname whose TXT records publish the DID
    pub location: Option<&'a str>,
}

impl<'a> IdentityProof<'a> {
    /// Reads the identity proof out of a certificate document.
    pub fn from_document(document: &'a Value) -> Option<Self> {
        let proof = document.pointer("/data/issuer/identityProof")?;
        if proof.is_null() {
            return None;
        }
        Some(Self {
            proof_type: proof.get("type").and_then(Value::as_str),
            key: proof.get("key").and_then(Value::as_str),
            location: proof.get("location").and_then(Value::as_str),
        })
    }
}

/// The `data` object whose content is committed to by the target hash.
pub fn document_data(document: &Value) -> Option<&Value> {
    document.get("data").filter(|data| !data.is_null())
}

/// The embedded `signature.targetHash`, when it is a string.
pub fn target_hash(document: &Value) -> Option<&str> {
    document.pointer("/signature/targetHash").and_then(Value::as_str)
}

/// The document's issuer name rendered for reporting.
///
/// Non-string names are rendered as their JSON text.
pub fn issuer_name(document: &Value) -> Option<String> {
    match document.pointer("/data/issuer/name")? {
        Value::Null => None,
        Value::String(name) => Some(name.clone()),
        other => Some(other.to_string()),
    }
}
