// src/utils/crypto.rs
//! Digest helpers used by the canonical hasher.
//!
//! Certificates commit to their content with SHA-256, rendered as lowercase
//! hex. The target hash embedded in issued documents uses the same encoding,
//! so comparisons are plain string equality.

use ring::digest::{digest, SHA256};

/// Computes the SHA-256 digest of `data` as a lowercase hex string.
///
/// # Arguments
/// * `data` - Binary data to hash (as bytes slice)
///
/// # Returns
/// 64-character lowercase hex string.
///
/// # Example
/// ```
/// use dns_did_verifier::utils::crypto::sha256_hex;
///
/// assert_eq!(
///     sha256_hex(b"abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(digest(&SHA256, data).as_ref())
}
