//! Storage module for persisting analysis jobs
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Job creation with URL uniqueness
//! - Atomic status transitions (queued -> running, terminal -> queued)
//! - Full-record saves of crawl results

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{JobStore, StorageError, StorageResult};

use crate::crawler::CrawlResult;
use crate::state::JobStatus;
use crate::AnalyzerError;
use serde::Serialize;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(AnalyzerError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, AnalyzerError> {
    Ok(SqliteStorage::new(path)?)
}

/// One URL's analysis request and its current state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisJob {
    pub id: i64,
    pub url: String,
    pub status: JobStatus,
    /// Set only while `status` is `Error`
    pub error_message: Option<String>,
    /// Present once a crawl has completed successfully
    pub metrics: Option<CrawlResult>,
    pub created_at: String,
    pub updated_at: String,
}

impl AnalysisJob {
    /// Records a successful crawl
    pub fn complete(&mut self, result: CrawlResult) {
        self.status = JobStatus::Done;
        self.error_message = None;
        self.metrics = Some(result);
    }

    /// Records a failed crawl, keeping any metrics already present
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Error;
        self.error_message = Some(message.into());
    }
}
