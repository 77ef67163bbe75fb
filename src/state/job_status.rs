/// Job status definitions for the analysis lifecycle
///
/// A job is created `Queued`, picked up as `Running`, and finishes in exactly
/// one terminal state. Only terminal jobs may be re-queued.
use serde::Serialize;
use std::fmt;

/// Represents the current state of an analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    // ===== Active States =====
    /// Job is waiting for a worker
    Queued,

    /// Job is being crawled
    Running,

    // ===== Terminal States =====
    /// Crawl finished and metrics are stored
    Done,

    /// Crawl failed; the job carries an error message
    Error,
}

impl JobStatus {
    /// Returns true if this is a terminal state (no further automatic transition)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Returns true if the job is queued or running
    ///
    /// In-flight jobs are never re-queued.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns all possible job statuses
    pub fn all_states() -> Vec<Self> {
        vec![Self::Queued, Self::Running, Self::Done, Self::Error]
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
