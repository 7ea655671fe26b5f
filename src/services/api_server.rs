// src/services/api_server.rs
//! HTTP API for certificate verification.
//!
//! Endpoints:
//! - `POST /certificates/verify` - multipart upload with a `certificate` file field
//! - `GET  /certificates/results?page=N` - paginated history of verdicts
//!
//! The optional `x-user-id` header identifies the caller. Authentication is
//! expected to happen upstream; the header value is passed through explicitly
//! to the service.

use crate::error::ServiceError;
use crate::models::verification_result::VerificationResult;
use crate::services::certificate_service::{CertificateService, CertificateUpload};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// Header carrying the authenticated caller's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Multipart field holding the certificate file.
const CERTIFICATE_FIELD: &str = "certificate";

/// Query string for result listing
#[derive(Serialize, Deserialize)]
struct ResultsQuery {
    page: Option<usize>,
}

/// Pagination metadata for result listing
#[derive(Serialize, Deserialize)]
struct PageMeta {
    current_page: usize,
    per_page: usize,
    total: usize,
    last_page: usize,
}

/// Response for result listing
#[derive(Serialize, Deserialize)]
struct ResultsResponse {
    data: Vec<VerificationResult>,
    meta: PageMeta,
}

/// API server state
#[derive(Clone)]
pub struct ApiServer {
    service: Arc<CertificateService>,
}

impl ApiServer {
    pub fn new(service: CertificateService) -> Self {
        ApiServer {
            service: Arc::new(service),
        }
    }

    /// Builds the router.
    ///
    /// Bodies are capped at twice the upload limit (plus multipart overhead)
    /// so that moderately oversized files still reach the service and get a
    /// validation error rather than a bare 413.
    pub fn router(&self) -> Router {
        let hard_cap = self.service.max_upload_bytes().saturating_mul(2) + 64 * 1024;

        Router::new()
            .route("/certificates/verify", post(Self::verify_handler))
            .route("/certificates/results", get(Self::results_handler))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(hard_cap))
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and serves until the process exits.
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("API server listening on http://{}", addr);
        axum::serve(listener, self.router()).await
    }

    /// Verifies an uploaded certificate
    ///
    /// # Endpoint
    /// POST /certificates/verify
    ///
    /// # Responses
    /// - 200 OK: `{"data": {"issuer": .., "result": ..}}`
    /// - 422 Unprocessable Entity: missing, non-JSON, oversized or malformed file
    async fn verify_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, ServiceError> {
        let mut upload = None;

        while let Some(field) = multipart.next_field().await.map_err(Self::upload_error)? {
            if field.name() != Some(CERTIFICATE_FIELD) {
                continue;
            }
            let file_name = field.file_name().unwrap_or_default().to_string();
            let contents = field.bytes().await.map_err(Self::upload_error)?;
            upload = Some(CertificateUpload {
                file_name,
                contents: contents.to_vec(),
            });
            break;
        }

        let upload = upload.ok_or_else(|| {
            ServiceError::InvalidUpload("The certificate field is required.".to_string())
        })?;

        let report = state
            .service
            .verify_upload(upload, Self::caller(&headers))
            .await?;

        Ok((StatusCode::OK, Json(json!({ "data": report }))))
    }

    /// Lists recorded verification results
    ///
    /// # Endpoint
    /// GET /certificates/results?page=N
    ///
    /// # Responses
    /// - 200 OK: `{"data": [..], "meta": {..}}`
    async fn results_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        Query(query): Query<ResultsQuery>,
    ) -> impl IntoResponse {
        let page = state
            .service
            .results(Self::caller(&headers), query.page.unwrap_or(1))
            .await;

        (
            StatusCode::OK,
            Json(ResultsResponse {
                data: page.data,
                meta: PageMeta {
                    current_page: page.current_page,
                    per_page: page.per_page,
                    total: page.total,
                    last_page: page.last_page,
                },
            }),
        )
    }

    fn caller(headers: &HeaderMap) -> Option<u64> {
        headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }

    fn upload_error(e: axum::extract::multipart::MultipartError) -> ServiceError {
        log::debug!("Unreadable multipart upload: {}", e);
        ServiceError::InvalidUpload("The certificate failed to upload.".to_string())
    }
}
