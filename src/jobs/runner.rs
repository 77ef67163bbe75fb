//! Single job execution
//!
//! A run claims the job with a `queued -> running` compare-and-swap, crawls
//! the URL and persists the outcome once. Jobs that are gone or already
//! claimed are skipped.

use crate::crawler::CrawlExecutor;
use crate::state::JobStatus;
use crate::storage::JobStore;
use std::sync::Arc;

/// Runs analysis jobs against a shared store
pub struct JobRunner {
    store: Arc<dyn JobStore>,
    executor: CrawlExecutor,
}

impl JobRunner {
    /// Creates a runner with an injected store and executor
    pub fn new(store: Arc<dyn JobStore>, executor: CrawlExecutor) -> Self {
        Self { store, executor }
    }

    /// Runs one job to completion
    ///
    /// Nothing is returned to the caller: the submitter has already been
    /// answered, so every failure ends up either on the job record or in
    /// the log.
    pub async fn run(&self, job_id: i64) {
        match self.store.find_by_id(job_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!("Job {} no longer exists, skipping", job_id);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to load job {}: {}", job_id, e);
                return;
            }
        }

        match self
            .store
            .try_transition(job_id, JobStatus::Queued, JobStatus::Running)
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("Job {} is not queued, skipping", job_id);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to claim job {}: {}", job_id, e);
                return;
            }
        }

        // Reload so the record carries the `running` timestamp
        let mut job = match self.store.find_by_id(job_id) {
            Ok(Some(job)) => job,
            Ok(None) => {
                tracing::warn!("Job {} was deleted while starting", job_id);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to reload job {}: {}", job_id, e);
                return;
            }
        };

        tracing::info!("Analyzing {} (job {})", job.url, job_id);

        match self.executor.crawl_url(&job.url).await {
            Ok(result) => {
                tracing::info!(
                    "Job {} done: {} internal, {} external, {} broken",
                    job_id,
                    result.internal_links,
                    result.external_links,
                    result.inaccessible_links
                );
                job.complete(result);
            }
            Err(e) => {
                tracing::info!("Job {} failed: {}", job_id, e);
                job.fail(e.to_string());
            }
        }

        if let Err(e) = self.store.save(&job) {
            tracing::error!("Failed to save job {}: {}", job_id, e);
        }
    }
}
