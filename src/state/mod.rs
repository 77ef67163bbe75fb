//! State module for tracking analysis job progress
//!
//! # Components
//!
//! - `JobStatus`: Lifecycle state of an analysis job (queued, running, done, error)

mod job_status;

// Re-export main types
pub use job_status::JobStatus;
