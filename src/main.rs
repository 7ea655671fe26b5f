// src/main.rs

//! # DNS-DID Certificate Verifier - Main Entry Point
//!
//! Wires the verifier to a DNS-over-HTTPS resolver and an in-memory result
//! store, then serves the HTTP API.
//!
//! ## Configuration
//! See `config.rs`. Commonly set through the environment:
//! - `VERIFIER__SERVER__HOST` / `VERIFIER__SERVER__PORT`: bind address (default 127.0.0.1:3000)
//! - `VERIFIER__RESOLVER__ENDPOINT`: JSON DoH endpoint (default https://dns.google/resolve)
//! - `VERIFIER__RESOLVER__TIMEOUT_SECS`: per-lookup timeout (default 5)
//! - `RUST_LOG`: log filter (default `info`)

use anyhow::Context;
use dns_did_verifier::config::Settings;
use dns_did_verifier::services::api_server::ApiServer;
use dns_did_verifier::services::certificate_service::CertificateService;
use dns_did_verifier::services::identity_resolver::{DnsOverHttps, IdentityResolver};
use dns_did_verifier::services::verifier::Verifier;
use dns_did_verifier::storage::result_store::InMemoryResultStore;
use dotenv::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("failed to load configuration")?;
    let addr = settings.bind_addr()?;

    let dns = DnsOverHttps::new(settings.resolver.endpoint.clone(), settings.resolver_timeout())
        .context("failed to build DNS-over-HTTPS client")?;
    log::info!(
        "Resolving issuer identities via {} (timeout {:?})",
        settings.resolver.endpoint,
        settings.resolver_timeout()
    );

    let verifier = Verifier::new(IdentityResolver::new(Arc::new(dns)));
    let service = CertificateService::new(
        verifier,
        Arc::new(InMemoryResultStore::new()),
        settings.upload.max_bytes,
        settings.results.per_page,
    );

    log::info!("Available endpoints:");
    log::info!("- POST /certificates/verify");
    log::info!("- GET  /certificates/results");

    ApiServer::new(service).run(addr).await?;
    Ok(())
}
