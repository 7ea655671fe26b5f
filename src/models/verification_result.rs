// src/models/verification_result.rs
//! Persisted record of a verification run.

use crate::models::certificate::VerificationOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored verification run.
///
/// # Fields
/// - `id`: Store-assigned, monotonically increasing
/// - `user_id`: Caller who ran the verification, if authenticated
/// - `file_type`: Uploaded file kind; always "json" today
/// - `result`: The verdict
/// - `created_at`: When the run was recorded
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub id: u64,
    pub user_id: Option<u64>,
    pub file_type: String,
    pub result: VerificationOutcome,
    pub created_at: DateTime<Utc>,
}

/// A verification run not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVerificationResult {
    pub user_id: Option<u64>,
    pub file_type: String,
    pub result: VerificationOutcome,
}

impl NewVerificationResult {
    pub fn json(user_id: Option<u64>, result: VerificationOutcome) -> Self {
        Self {
            user_id,
            file_type: "json".to_string(),
            result,
        }
    }
}

/// One page of results, 1-based.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: usize,
    pub per_page: usize,
    pub total: usize,
    pub last_page: usize,
}
