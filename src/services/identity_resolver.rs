// src/services/identity_resolver.rs
//! Issuer identity resolution through DNS TXT records.
//!
//! An issuer proves control of a DID by publishing it in a TXT record on the
//! hostname named in `identityProof.location`, e.g.
//!
//! ```text
//! "openatts a=dns-did; p=did:ethr:0x05b6...#controller; v=1.0;"
//! ```
//!
//! The DNS capability sits behind [`TxtLookup`] so the verifier can run
//! against a fixed record set in tests. [`DnsOverHttps`] is the production
//! adapter and speaks the JSON DoH API served by `dns.google/resolve`.

use crate::error::LookupError;
use crate::models::certificate::IdentityProof;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Semicolon-terminated DID token inside a TXT value.
static DID_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(did:eth[^;]*);").expect("DID token pattern is valid"));

/// Source of raw TXT record strings for a hostname.
#[async_trait]
pub trait TxtLookup: Send + Sync {
    /// Returns the TXT record contents for `name`, in answer order.
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError>;
}

/// TXT lookup over a JSON DNS-over-HTTPS resolver.
#[derive(Clone)]
pub struct DnsOverHttps {
    client: reqwest::Client,
    endpoint: String,
}

impl DnsOverHttps {
    /// Builds a DoH client.
    ///
    /// # Arguments
    /// * `endpoint` - Resolver URL, e.g. "https://dns.google/resolve"
    /// * `timeout` - Upper bound for each query; expiry counts as a failed lookup
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dns-did-verifier/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl TxtLookup for DnsOverHttps {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("name", name), ("type", "TXT")])
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        parse_answers(&body)
    }
}

/// Extracts `Answer[].data` from a JSON DoH response body.
///
/// Entries without a string `data` field are skipped.
pub fn parse_answers(body: &Value) -> Result<Vec<String>, LookupError> {
    match body.get("Answer") {
        None | Some(Value::Null) => Err(LookupError::NoAnswer),
        Some(Value::Array(answers)) => Ok(answers
            .iter()
            .filter_map(|answer| answer.get("data").and_then(Value::as_str))
            .map(str::to_string)
            .collect()),
        Some(other) => Err(LookupError::Malformed(format!(
            "Answer is not a list: {}",
            other
        ))),
    }
}

/// Returns the first DID token in a TXT value, without its `;`.
pub fn extract_did(record: &str) -> Option<&str> {
    DID_TOKEN
        .captures(record)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str())
}

/// Result of checking an identity proof against DNS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// A TXT record publishes the claimed key
    Found,
    /// Records exist but none publishes the claimed key
    NotFound,
    /// No answer set could be obtained
    LookupFailed,
}

/// Resolves identity proofs with an injected TXT lookup.
#[derive(Clone)]
pub struct IdentityResolver {
    lookup: Arc<dyn TxtLookup>,
}

impl IdentityResolver {
    pub fn new(lookup: Arc<dyn TxtLookup>) -> Self {
        Self { lookup }
    }

    /// Checks whether `proof.location` publishes `proof.key`.
    ///
    /// Records are scanned in answer order and the first exact match wins.
    pub async fn resolve(&self, proof: &IdentityProof<'_>) -> ResolutionOutcome {
        let location = match proof.location {
            Some(location) if !location.is_empty() => location,
            _ => {
                log::warn!("Identity lookup skipped: {}", LookupError::MissingLocation);
                return ResolutionOutcome::LookupFailed;
            }
        };

        let records = match self.lookup.lookup_txt(location).await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("TXT lookup for {} failed: {}", location, e);
                return ResolutionOutcome::LookupFailed;
            }
        };

        let found = proof.key.map_or(false, |key| {
            records
                .iter()
                .filter_map(|record| extract_did(record))
                .any(|did| did == key)
        });

        if found {
            log::debug!("{} publishes the claimed DID", location);
            ResolutionOutcome::Found
        } else {
            log::info!(
                "No TXT record on {} publishes {} ({} records scanned)",
                location,
                proof.key.unwrap_or("<missing key>"),
                records.len()
            );
            ResolutionOutcome::NotFound
        }
    }
}
