// src/services/certificate_service.rs
//! Boundary service around the verifier.
//!
//! Screens uploads, runs the verifier, and records each verdict. The caller's
//! identity is passed in explicitly; nothing here reads ambient session state.

use crate::error::{ServiceError, ServiceResult};
use crate::models::certificate::VerificationReport;
use crate::models::verification_result::{NewVerificationResult, Page, VerificationResult};
use crate::services::verifier::Verifier;
use crate::storage::result_store::ResultStore;
use crate::utils::serialization::deserialize_slice;
use serde_json::Value;
use std::sync::Arc;

/// An uploaded certificate file.
#[derive(Debug, Clone)]
pub struct CertificateUpload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

#[derive(Clone)]
pub struct CertificateService {
    verifier: Verifier,
    store: Arc<dyn ResultStore>,
    max_upload_bytes: usize,
    per_page: usize,
}

impl CertificateService {
    pub fn new(
        verifier: Verifier,
        store: Arc<dyn ResultStore>,
        max_upload_bytes: usize,
        per_page: usize,
    ) -> Self {
        Self {
            verifier,
            store,
            max_upload_bytes,
            per_page,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Verifies an uploaded certificate and records the verdict.
    ///
    /// # Errors
    /// `ServiceError::InvalidUpload` when the file is not a `.json` file, is
    /// over the size limit, or does not hold a JSON object with `data`. Such
    /// uploads are not recorded.
    pub async fn verify_upload(
        &self,
        upload: CertificateUpload,
        user_id: Option<u64>,
    ) -> ServiceResult<VerificationReport> {
        let document = self.screen(&upload)?;

        let report = self.verifier.verify(&document).await;

        let stored = self
            .store
            .save(NewVerificationResult::json(user_id, report.result))
            .await;
        log::debug!("Recorded verification result {}", stored.id);

        Ok(report)
    }

    /// Lists recorded runs, restricted to `user_id` when given.
    pub async fn results(&self, user_id: Option<u64>, page: usize) -> Page<VerificationResult> {
        self.store.paginate(user_id, page, self.per_page).await
    }

    fn screen(&self, upload: &CertificateUpload) -> ServiceResult<Value> {
        if !upload.file_name.to_ascii_lowercase().ends_with(".json") {
            return Err(ServiceError::InvalidUpload(
                "The certificate must be a file of type: json.".to_string(),
            ));
        }

        if upload.contents.len() > self.max_upload_bytes {
            return Err(ServiceError::InvalidUpload(format!(
                "The certificate must not be greater than {} kilobytes.",
                self.max_upload_bytes / 1024
            )));
        }

        let document: Value = deserialize_slice(&upload.contents).map_err(|e| {
            log::debug!("Rejected {}: {}", upload.file_name, e);
            ServiceError::InvalidUpload("The file has invalid JSON content.".to_string())
        })?;

        match document.get("data") {
            Some(data) if !data.is_null() => Ok(document),
            _ => Err(ServiceError::InvalidUpload(
                "The file has invalid JSON content.".to_string(),
            )),
        }
    }
}
