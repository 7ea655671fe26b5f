// src/services/verifier.rs
//! Certificate verification engine.
//!
//! Runs the checks in a fixed order and stops at the first failure:
//!
//! ```text
//! RecipientCheck -> IssuerCheck -> IdentityCheck -> SignatureCheck -> verified
//!       |               |              |                 |
//! invalid_recipient  invalid_issuer  invalid_issuer  invalid_signature
//! ```
//!
//! Every branch is an expected verdict; nothing here returns an error.

use crate::models::certificate::{
    document_data, issuer_name, target_hash, IdentityProof, VerificationOutcome,
    VerificationReport, UNKNOWN_ISSUER,
};
use crate::services::hasher::matches_target_hash;
use crate::services::identity_resolver::{IdentityResolver, ResolutionOutcome};
use crate::services::validator::{validate_issuer, validate_recipient};
use serde_json::Value;

/// Certificate verifier.
///
/// Holds no per-run state, so one instance can serve concurrent runs.
#[derive(Clone)]
pub struct Verifier {
    resolver: IdentityResolver,
}

impl Verifier {
    /// Constructs a verifier around an identity resolver.
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    /// Verifies a parsed certificate document.
    ///
    /// # Returns
    /// The verdict plus the best-known issuer name:
    /// - `invalid_recipient`: the document's issuer name if it has one
    /// - `invalid_issuer` from missing issuer fields: `"Unknown"`
    /// - any later verdict: the document's issuer name
    pub async fn verify(&self, document: &Value) -> VerificationReport {
        if !validate_recipient(document) {
            return Self::report(
                issuer_name(document).unwrap_or_else(|| UNKNOWN_ISSUER.to_string()),
                VerificationOutcome::InvalidRecipient,
            );
        }

        if !validate_issuer(document) {
            return Self::report(UNKNOWN_ISSUER.to_string(), VerificationOutcome::InvalidIssuer);
        }

        // Both are guaranteed by the issuer check.
        let issuer = issuer_name(document).unwrap_or_else(|| UNKNOWN_ISSUER.to_string());
        let proof = match IdentityProof::from_document(document) {
            Some(proof) => proof,
            None => return Self::report(issuer, VerificationOutcome::InvalidIssuer),
        };

        match self.resolver.resolve(&proof).await {
            ResolutionOutcome::Found => {}
            ResolutionOutcome::NotFound | ResolutionOutcome::LookupFailed => {
                return Self::report(issuer, VerificationOutcome::InvalidIssuer);
            }
        }

        let intact = match (document_data(document), target_hash(document)) {
            (Some(data), Some(expected)) => matches_target_hash(data, expected),
            _ => false,
        };

        if intact {
            Self::report(issuer, VerificationOutcome::Verified)
        } else {
            Self::report(issuer, VerificationOutcome::InvalidSignature)
        }
    }

    fn report(issuer: String, result: VerificationOutcome) -> VerificationReport {
        log::info!("Certificate from {} verified as {}", issuer, result);
        VerificationReport { issuer, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::services::identity_resolver::TxtLookup;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const KEY: &str = "did:ethr:0x05b642ff12a4ae545357d82ba4f786f3aed84214#controller";
    const LOCATION: &str = "ropstore.accredify.io";

    /// Serves one TXT record set for `LOCATION` and counts queries.
    struct FakeDns {
        records: Option<Vec<String>>,
        queries: AtomicUsize,
    }

    #[async_trait]
    impl TxtLookup for FakeDns {
        async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            match (&self.records, name == LOCATION) {
                (Some(records), true) => Ok(records.clone()),
                _ => Err(LookupError::NoAnswer),
            }
        }
    }

    fn verifier_with(records: Option<Vec<String>>) -> (Verifier, Arc<FakeDns>) {
        let dns = Arc::new(FakeDns {
            records,
            queries: AtomicUsize::new(0),
        });
        (Verifier::new(IdentityResolver::new(dns.clone())), dns)
    }

    fn publishing_verifier() -> (Verifier, Arc<FakeDns>) {
        verifier_with(Some(vec![
            "v=spf1 -all".to_string(),
            format!("openatts a=dns-did; p={}; v=1.0;", KEY),
        ]))
    }

    fn certificate() -> Value {
        json!({
            "data": {
                "id": "63c79bd9303530645d1cca00",
                "name": "Certificate of Completion",
                "recipient": {
                    "name": "Marty McFly",
                    "email": "marty.mcfly@gmail.com"
                },
                "issuer": {
                    "name": "Accredify",
                    "identityProof": {
                        "type": "DNS-DID",
                        "key": KEY,
                        "location": LOCATION
                    }
                },
                "issued": "2022-12-23T00:00:00+08:00"
            },
            "signature": {
                "type": "SHA3MerkleProof",
                "targetHash": "288f94aadadf486cfdad84b9f4305f7d51eac62db18376d48180cc1dd2047a0e"
            }
        })
    }

    fn without(mut doc: Value, parent: &str, field: &str) -> Value {
        if let Some(Value::Object(map)) = doc.pointer_mut(parent) {
            map.remove(field);
        }
        doc
    }

    #[tokio::test]
    async fn test_issued_certificate_is_verified() {
        let (verifier, _) = publishing_verifier();

        let report = verifier.verify(&certificate()).await;

        assert_eq!(report.result, VerificationOutcome::Verified);
        assert_eq!(report.issuer, "Accredify");
    }

    #[tokio::test]
    async fn test_missing_recipient_fields() {
        let (verifier, dns) = publishing_verifier();

        for field in ["name", "email"] {
            let doc = without(certificate(), "/data/recipient", field);
            let report = verifier.verify(&doc).await;
            assert_eq!(report.result, VerificationOutcome::InvalidRecipient);
            assert_eq!(report.issuer, "Accredify");
        }
        assert_eq!(dns.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recipient_check_wins_over_issuer_check() {
        let (verifier, _) = publishing_verifier();
        let doc = without(without(certificate(), "/data", "recipient"), "/data", "issuer");

        let report = verifier.verify(&doc).await;

        assert_eq!(report.result, VerificationOutcome::InvalidRecipient);
        assert_eq!(report.issuer, UNKNOWN_ISSUER);
    }

    #[tokio::test]
    async fn test_missing_issuer_fields_report_unknown() {
        let (verifier, dns) = publishing_verifier();

        for field in ["name", "identityProof"] {
            let doc = without(certificate(), "/data/issuer", field);
            let report = verifier.verify(&doc).await;
            assert_eq!(report.result, VerificationOutcome::InvalidIssuer);
            assert_eq!(report.issuer, UNKNOWN_ISSUER);
        }
        assert_eq!(dns.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unpublished_location_is_invalid_issuer() {
        let (verifier, _) = publishing_verifier();
        let mut doc = certificate();
        doc["data"]["issuer"]["identityProof"]["location"] = json!("nobody-home.example");

        let report = verifier.verify(&doc).await;

        assert_eq!(report.result, VerificationOutcome::InvalidIssuer);
        assert_eq!(report.issuer, "Accredify");
    }

    #[tokio::test]
    async fn test_wrong_key_is_invalid_issuer() {
        let (verifier, _) = publishing_verifier();
        let mut doc = certificate();
        doc["data"]["issuer"]["identityProof"]["key"] = json!("did:ethr:0x0000#controller");

        let report = verifier.verify(&doc).await;

        assert_eq!(report.result, VerificationOutcome::InvalidIssuer);
    }

    #[tokio::test]
    async fn test_location_without_matching_record() {
        let (verifier, _) = verifier_with(Some(vec!["google-site-verification=abc".to_string()]));

        let report = verifier.verify(&certificate()).await;

        assert_eq!(report.result, VerificationOutcome::InvalidIssuer);
        assert_eq!(report.issuer, "Accredify");
    }

    #[tokio::test]
    async fn test_tampered_content_is_invalid_signature() {
        let (verifier, _) = publishing_verifier();
        let mut doc = certificate();
        doc["data"]["id"] = json!("a3bb189e-8bf9-3888-9912-ace4e6543002");

        let report = verifier.verify(&doc).await;

        assert_eq!(report.result, VerificationOutcome::InvalidSignature);
        assert_eq!(report.issuer, "Accredify");
    }

    #[tokio::test]
    async fn test_reordered_content_still_verifies() {
        let (verifier, _) = publishing_verifier();
        let doc = json!({
            "signature": certificate()["signature"].clone(),
            "data": {
                "issued": "2022-12-23T00:00:00+08:00",
                "issuer": {
                    "identityProof": { "location": LOCATION, "key": KEY, "type": "DNS-DID" },
                    "name": "Accredify"
                },
                "recipient": { "email": "marty.mcfly@gmail.com", "name": "Marty McFly" },
                "name": "Certificate of Completion",
                "id": "63c79bd9303530645d1cca00"
            }
        });

        assert_eq!(verifier.verify(&doc).await.result, VerificationOutcome::Verified);
    }

    #[tokio::test]
    async fn test_missing_signature_is_invalid_signature() {
        let (verifier, _) = publishing_verifier();
        let doc = without(certificate(), "", "signature");

        let report = verifier.verify(&doc).await;

        assert_eq!(report.result, VerificationOutcome::InvalidSignature);
    }

    #[tokio::test]
    async fn test_document_is_not_mutated() {
        let (verifier, _) = publishing_verifier();
        let doc = certificate();
        let before = doc.clone();

        verifier.verify(&doc).await;

        assert_eq!(doc, before);
    }
}
