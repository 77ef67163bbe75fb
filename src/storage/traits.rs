//! Storage traits and error types
//!
//! This module defines the trait interface for job storage backends and
//! associated error types.

use crate::state::JobStatus;
use crate::storage::AnalysisJob;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Analysis job not found: {0}")]
    JobNotFound(i64),

    #[error("URL already submitted: {0}")]
    DuplicateUrl(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for job storage backend implementations
///
/// Implementations must be safe to share between concurrently running jobs.
/// Status changes that guard against duplicate runs go through the
/// compare-and-swap methods rather than `save`.
pub trait JobStore: Send + Sync {
    // ===== Lookup =====

    /// Gets a job by ID
    fn find_by_id(&self, id: i64) -> StorageResult<Option<AnalysisJob>>;

    /// Gets a job by its submitted URL
    fn find_by_url(&self, url: &str) -> StorageResult<Option<AnalysisJob>>;

    /// Lists every job, newest first
    fn list_all(&self) -> StorageResult<Vec<AnalysisJob>>;

    /// Counts jobs in a given status
    fn count_by_status(&self, status: JobStatus) -> StorageResult<u64>;

    // ===== Mutation =====

    /// Creates a new `Queued` job for `url`
    ///
    /// Fails with `StorageError::DuplicateUrl` if the URL is already stored.
    fn create(&self, url: &str) -> StorageResult<AnalysisJob>;

    /// Overwrites every field of an existing job
    fn save(&self, job: &AnalysisJob) -> StorageResult<()>;

    /// Deletes jobs by ID and returns how many existed
    fn delete(&self, ids: &[i64]) -> StorageResult<u64>;

    // ===== Atomic Transitions =====

    /// Sets `to` only if the job is currently in `from`
    ///
    /// Returns true if the transition happened.
    fn try_transition(&self, id: i64, from: JobStatus, to: JobStatus) -> StorageResult<bool>;

    /// Resets a terminal job to `Queued`, clearing its error and metrics
    ///
    /// Returns false (and changes nothing) if the job is queued, running or
    /// missing.
    fn requeue(&self, id: i64) -> StorageResult<bool>;
}
