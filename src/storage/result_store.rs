// src/storage/result_store.rs
//! Storage for verification outcomes.
//!
//! The verifier itself never persists anything; the certificate service
//! records each run here after the verdict is known.

use crate::models::verification_result::{NewVerificationResult, Page, VerificationResult};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistence for verification runs.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Records a run and returns it with its assigned id.
    async fn save(&self, result: NewVerificationResult) -> VerificationResult;

    /// Returns one page of runs, oldest first.
    ///
    /// # Arguments
    /// * `user_id` - Restrict to this caller's runs; `None` returns all runs
    /// * `page` - 1-based page number; 0 is treated as 1
    /// * `per_page` - Page size; 0 is treated as 1
    async fn paginate(
        &self,
        user_id: Option<u64>,
        page: usize,
        per_page: usize,
    ) -> Page<VerificationResult>;
}

/// Process-local result store.
///
/// Thread-safe via `Arc<RwLock<..>>`; clones share the same records.
/// Records live only as long as the process and are never evicted, so this
/// is not durable storage. Deployments that need history across restarts
/// should provide a database-backed `ResultStore`.
#[derive(Clone, Default)]
pub struct InMemoryResultStore {
    results: Arc<RwLock<Vec<VerificationResult>>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save(&self, result: NewVerificationResult) -> VerificationResult {
        let mut results = self.results.write().await;
        let stored = VerificationResult {
            id: results.last().map_or(1, |last| last.id + 1),
            user_id: result.user_id,
            file_type: result.file_type,
            result: result.result,
            created_at: Utc::now(),
        };
        results.push(stored.clone());
        stored
    }

    async fn paginate(
        &self,
        user_id: Option<u64>,
        page: usize,
        per_page: usize,
    ) -> Page<VerificationResult> {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let results = self.results.read().await;

        let matching: Vec<&VerificationResult> = results
            .iter()
            .filter(|r| user_id.map_or(true, |id| r.user_id == Some(id)))
            .collect();

        let total = matching.len();
        let data = matching
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .cloned()
            .collect();

        Page {
            data,
            current_page: page,
            per_page,
            total,
            last_page: total.div_ceil(per_page).max(1),
        }
    }
}
