//! Page Analyzer: single-page HTML analysis with concurrent link checking
//!
//! This crate fetches a submitted page, extracts structural metrics (HTML
//! version, title, heading counts, login-form presence), classifies every
//! outbound link as internal or external and probes each one concurrently to
//! find broken links. Every submission is tracked as a persisted job moving
//! through `queued -> running -> done | error`.

pub mod config;
pub mod crawler;
pub mod jobs;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for page analyzer operations
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to fetch URL {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("non-OK status code: {status} {reason}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("failed to parse HTML for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Analysis job {0} not found")]
    JobNotFound(i64),

    #[error("Job queue is shut down")]
    QueueClosed,

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for page analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BrokenLink, CrawlExecutor, CrawlResult, HtmlVersion};
pub use jobs::{AnalysisService, JobQueue, JobRunner};
pub use state::JobStatus;
pub use storage::{AnalysisJob, JobStore, SqliteStorage};
