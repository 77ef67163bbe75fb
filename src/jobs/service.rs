//! Analysis service
//!
//! The caller-facing operations. Submissions and re-runs are acknowledged as
//! soon as the job is persisted and handed to the queue; the crawl itself
//! happens in the background.

use crate::config::Config;
use crate::crawler::CrawlExecutor;
use crate::jobs::queue::JobQueue;
use crate::jobs::runner::JobRunner;
use crate::output::{load_statistics, JobStatistics};
use crate::storage::{open_storage, AnalysisJob, JobStore, StorageError};
use crate::AnalyzerError;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Result of submitting a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new job was created and queued
    Created(AnalysisJob),

    /// The URL was already submitted; nothing was queued
    Existing(AnalysisJob),
}

impl SubmitOutcome {
    /// The job this submission refers to
    pub fn job(&self) -> &AnalysisJob {
        match self {
            Self::Created(job) | Self::Existing(job) => job,
        }
    }

    /// Returns true if the submission created a new job
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Outcome of a re-run request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RerunSummary {
    /// Jobs moved back to `queued`
    pub requeued: Vec<i64>,

    /// Unknown ids and jobs that were still queued or running
    pub skipped: Vec<i64>,
}

/// Job lifecycle operations backed by a store and a worker pool
pub struct AnalysisService {
    store: Arc<dyn JobStore>,
    queue: JobQueue,
}

impl AnalysisService {
    /// Creates a service and starts its worker pool
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn JobStore>, executor: CrawlExecutor, config: &Config) -> Self {
        let runner = Arc::new(JobRunner::new(store.clone(), executor));
        let queue = JobQueue::start(
            runner,
            config.analyzer.max_concurrent_jobs as usize,
            config.analyzer.job_queue_capacity as usize,
        );

        Self { store, queue }
    }

    /// Opens the configured database and builds the HTTP stack
    pub fn from_config(config: &Config) -> Result<Self, AnalyzerError> {
        let storage = open_storage(Path::new(&config.storage.database_path))?;
        let executor = CrawlExecutor::from_config(config)?;
        Ok(Self::new(Arc::new(storage), executor, config))
    }

    /// A handle on the store this service reads and writes
    pub fn store(&self) -> Arc<dyn JobStore> {
        self.store.clone()
    }

    /// Submits a URL for analysis
    ///
    /// A URL that was submitted before returns its existing job untouched.
    /// Only absolute `http` and `https` URLs are accepted.
    pub async fn submit(&self, url: &str) -> Result<SubmitOutcome, AnalyzerError> {
        validate_submission(url)?;

        if let Some(existing) = self.store.find_by_url(url)? {
            tracing::debug!("URL {} already submitted as job {}", url, existing.id);
            return Ok(SubmitOutcome::Existing(existing));
        }

        let job = match self.store.create(url) {
            Ok(job) => job,
            Err(StorageError::DuplicateUrl(_)) => {
                // Lost a race with a concurrent submission of the same URL
                let existing = self
                    .store
                    .find_by_url(url)?
                    .ok_or_else(|| StorageError::DuplicateUrl(url.to_string()))?;
                return Ok(SubmitOutcome::Existing(existing));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!("Queued job {} for {}", job.id, job.url);
        self.queue.enqueue(job.id).await?;

        Ok(SubmitOutcome::Created(job))
    }

    /// Gets one job
    pub fn get(&self, id: i64) -> Result<AnalysisJob, AnalyzerError> {
        self.store
            .find_by_id(id)?
            .ok_or(AnalyzerError::JobNotFound(id))
    }

    /// Lists every job, newest first
    pub fn list(&self) -> Result<Vec<AnalysisJob>, AnalyzerError> {
        Ok(self.store.list_all()?)
    }

    /// Re-queues finished jobs
    ///
    /// Jobs that are queued or running, and ids that do not exist, are
    /// skipped without error.
    pub async fn rerun(&self, ids: &[i64]) -> Result<RerunSummary, AnalyzerError> {
        let mut summary = RerunSummary::default();

        for &id in ids {
            if self.store.requeue(id)? {
                tracing::info!("Re-queued job {}", id);
                self.queue.enqueue(id).await?;
                summary.requeued.push(id);
            } else {
                match self.store.find_by_id(id)? {
                    Some(job) if job.status.is_in_flight() => {
                        tracing::warn!("Job {} is still {}, not re-running", id, job.status)
                    }
                    Some(job) => {
                        tracing::warn!("Job {} could not be re-queued from {}", id, job.status)
                    }
                    None => tracing::warn!("Job {} not found, not re-running", id),
                }
                summary.skipped.push(id);
            }
        }

        Ok(summary)
    }

    /// Deletes jobs and returns how many existed
    pub fn delete(&self, ids: &[i64]) -> Result<u64, AnalyzerError> {
        let removed = self.store.delete(ids)?;
        tracing::info!("Deleted {} of {} requested jobs", removed, ids.len());
        Ok(removed)
    }

    /// Job counts by status and link totals
    pub fn statistics(&self) -> Result<JobStatistics, AnalyzerError> {
        load_statistics(self.store.as_ref())
    }

    /// Stops accepting work and waits for queued and running jobs to finish
    pub async fn shutdown(self) {
        self.queue.shutdown().await;
    }
}

/// Checks that `url` is an absolute http(s) URL with a host
pub fn validate_submission(url: &str) -> Result<(), AnalyzerError> {
    let parsed = Url::parse(url).map_err(|e| AnalyzerError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AnalyzerError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AnalyzerError::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(())
}
