// src/error.rs
//! Error types for the verifier.
//!
//! Domain failures (missing fields, unknown issuer, hash mismatch) are
//! verdicts, not errors. The types here cover lookups that could not be
//! performed, uploads rejected at the boundary, and startup faults.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why a TXT lookup produced no answer set.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("identity proof has no location")]
    MissingLocation,

    #[error("DNS-over-HTTPS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("resolver returned HTTP {0}")]
    Status(u16),

    #[error("resolver returned no answer section")]
    NoAnswer,

    #[error("malformed resolver response: {0}")]
    Malformed(String),
}

/// Errors surfaced to the boundary layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Upload rejected before verification
    #[error("{0}")]
    InvalidUpload(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            ServiceError::InvalidUpload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        log::info!("Rejected request: {}", self);

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Startup configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
