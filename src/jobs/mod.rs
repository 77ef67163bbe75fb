//! Job execution module
//!
//! # Components
//!
//! - `JobRunner`: Runs one analysis job from `queued` to a terminal state
//! - `JobQueue`: Bounded intake of job ids with a fixed-size worker pool
//! - `AnalysisService`: The operations exposed to callers (submit, get, list,
//!   rerun, delete, statistics)

mod queue;
mod runner;
mod service;

// Re-export main types
pub use queue::JobQueue;
pub use runner::JobRunner;
pub use service::{AnalysisService, RerunSummary, SubmitOutcome};
