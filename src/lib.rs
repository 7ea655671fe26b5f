// src/lib.rs

//! # DNS-DID Certificate Verifier
//!
//! Verifies JSON credential documents ("certificates") without a central
//! registry. A certificate passes when:
//! 1. its recipient and issuer fields are present,
//! 2. the issuer's DID is published in a DNS TXT record at the claimed location,
//! 3. its content hashes to the embedded `signature.targetHash`.
//!
//! ## Layout
//! - `services::verifier`: the verification engine
//! - `services::validator`, `services::identity_resolver`, `services::hasher`: its stages
//! - `services::certificate_service`, `services::api_server`: upload boundary and HTTP API
//! - `storage`: verdict persistence
//! - `models`: document views, verdicts and stored results
//! - `utils`: digests and canonical serialization

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;
