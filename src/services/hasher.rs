// src/services/hasher.rs
//! Canonical content hashing for certificates.
//!
//! The target hash is a sorted commitment list rather than a Merkle tree:
//! 1. flatten `data` to `(dot.path, leaf)` pairs
//! 2. hash each `{path: leaf}` singleton with SHA-256
//! 3. sort the hex digests
//! 4. hash the JSON array of sorted digests
//!
//! Sorting makes the result independent of key order. Previously issued
//! certificates depend on this exact procedure, so it must not change.

use crate::utils::crypto::sha256_hex;
use crate::utils::serialization::{encode_canonical, encode_leaf_entry, flatten_dot_notation};
use serde_json::Value;

/// Computes the target hash of a certificate's `data` object.
pub fn compute_target_hash(data: &Value) -> String {
    let mut digests: Vec<String> = flatten_dot_notation(data)
        .into_iter()
        .map(|(path, leaf)| sha256_hex(encode_leaf_entry(&path, leaf).as_bytes()))
        .collect();

    digests.sort_unstable();

    let list = Value::Array(digests.into_iter().map(Value::String).collect());
    sha256_hex(encode_canonical(&list).as_bytes())
}

/// True iff the computed hash of `data` equals `expected` byte for byte.
pub fn matches_target_hash(data: &Value, expected: &str) -> bool {
    compute_target_hash(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE_TARGET_HASH: &str =
        "288f94aadadf486cfdad84b9f4305f7d51eac62db18376d48180cc1dd2047a0e";

    fn sample_data() -> Value {
        json!({
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
                    "key": "did:ethr:0x05b642ff12a4ae545357d82ba4f786f3aed84214#controller",
                    "location": "ropstore.accredify.io"
                }
            },
            "issued": "2022-12-23T00:00:00+08:00"
        })
    }

    #[test]
    fn test_issued_certificate_hash() {
        assert_eq!(compute_target_hash(&sample_data()), SAMPLE_TARGET_HASH);
        assert!(matches_target_hash(&sample_data(), SAMPLE_TARGET_HASH));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let reordered = json!({
            "issued": "2022-12-23T00:00:00+08:00",
            "issuer": {
                "identityProof": {
                    "location": "ropstore.accredify.io",
                    "key": "did:ethr:0x05b642ff12a4ae545357d82ba4f786f3aed84214#controller",
                    "type": "DNS-DID"
                },
                "name": "Accredify"
            },
            "recipient": {
                "email": "marty.mcfly@gmail.com",
                "name": "Marty McFly"
            },
            "name": "Certificate of Completion",
            "id": "63c79bd9303530645d1cca00"
        });

        assert_eq!(compute_target_hash(&reordered), SAMPLE_TARGET_HASH);
    }

    #[test]
    fn test_tampered_leaf_changes_hash() {
        let mut data = sample_data();
        data["id"] = json!("x");

        let hash = compute_target_hash(&data);
        assert_eq!(
            hash,
            "f07ba7a2742354558f6e883c80d5cc50c27a165d3dd573fbee4c7cf5d2e2259a"
        );
        assert!(!matches_target_hash(&data, SAMPLE_TARGET_HASH));
    }

    #[test]
    fn test_every_single_leaf_is_committed() {
        let paths = [
            "/id",
            "/name",
            "/recipient/name",
            "/recipient/email",
            "/issuer/name",
            "/issuer/identityProof/type",
            "/issuer/identityProof/key",
            "/issuer/identityProof/location",
            "/issued",
        ];

        for path in paths {
            let mut data = sample_data();
            if let Some(leaf) = data.pointer_mut(path) {
                *leaf = json!("tampered");
            }
            assert_ne!(compute_target_hash(&data), SAMPLE_TARGET_HASH, "{}", path);
        }
    }

    #[test]
    fn test_arrays_urls_and_unicode() {
        let mut data = sample_data();
        let map = data.as_object_mut().unwrap();
        map.insert("link".into(), json!("https://a.b/c"));
        map.insert("note".into(), json!("café"));
        map.insert("tags".into(), json!(["x", 1, true, null]));

        assert_eq!(
            compute_target_hash(&data),
            "7d75257d63e625f15f71f4950859a2bfa2b4014ae5fa43255f76ed39b51a6039"
        );
    }

    #[test]
    fn test_whole_number_float_hashes_like_integer() {
        let float: Value = serde_json::from_str(r#"{"score":1.0,"weight":-0.0}"#).unwrap();
        let integer: Value = serde_json::from_str(r#"{"score":1,"weight":-0.0}"#).unwrap();

        assert_eq!(compute_target_hash(&float), compute_target_hash(&integer));
    }

    #[test]
    fn test_case_difference_is_a_mismatch() {
        assert!(!matches_target_hash(&sample_data(), &SAMPLE_TARGET_HASH.to_uppercase()));
        assert!(!matches_target_hash(&sample_data(), &format!("{} ", SAMPLE_TARGET_HASH)));
    }
}
