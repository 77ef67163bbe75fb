//! Output module for reporting analysis jobs
//!
//! This module handles:
//! - Printing jobs as tables or detailed listings
//! - JSON export of job records
//! - Job statistics across the whole store

mod report;
pub mod stats;

pub use report::{print_job, print_job_table, print_jobs_json, to_json};
pub use stats::{load_statistics, print_statistics, JobStatistics};
