//! Statistics generation from the job database
//!
//! This module provides functionality for extracting and displaying
//! job statistics from the storage layer.

use crate::state::JobStatus;
use crate::storage::JobStore;
use crate::AnalyzerError;
use std::collections::HashMap;

/// Job statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatistics {
    /// Total number of jobs stored
    pub total_jobs: u64,

    /// Count of jobs by status (statuses with no jobs are omitted)
    pub jobs_by_status: HashMap<JobStatus, u64>,

    /// Internal links across all completed analyses
    pub total_internal_links: u64,

    /// External links across all completed analyses
    pub total_external_links: u64,

    /// Broken links across all completed analyses
    pub total_broken_links: u64,

    /// Completed analyses that found a login form
    pub pages_with_login_form: u64,
}

impl JobStatistics {
    /// Number of jobs in the given status
    pub fn count(&self, status: JobStatus) -> u64 {
        self.jobs_by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
///
/// # Returns
///
/// * `Ok(JobStatistics)` - Successfully loaded statistics
/// * `Err(AnalyzerError)` - Failed to query statistics
pub fn load_statistics(store: &dyn JobStore) -> Result<JobStatistics, AnalyzerError> {
    let mut stats = JobStatistics::default();

    for status in JobStatus::all_states() {
        let count = store.count_by_status(status)?;
        if count > 0 {
            stats.jobs_by_status.insert(status, count);
        }
        stats.total_jobs += count;
    }

    for metrics in store.list_all()?.iter().filter_map(|job| job.metrics.as_ref()) {
        stats.total_internal_links += u64::from(metrics.internal_links);
        stats.total_external_links += u64::from(metrics.external_links);
        stats.total_broken_links += u64::from(metrics.inaccessible_links);
        if metrics.has_login_form {
            stats.pages_with_login_form += 1;
        }
    }

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &JobStatistics) {
    println!("=== Job Statistics ===\n");

    println!("Jobs by Status:");
    for status in JobStatus::all_states() {
        let count = stats.count(status);
        let percentage = if stats.total_jobs > 0 {
            (count as f64 / stats.total_jobs as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", status, count, percentage);
    }
    println!("  Total: {}", stats.total_jobs);
    println!();

    println!("Links:");
    println!("  Internal: {}", stats.total_internal_links);
    println!("  External: {}", stats.total_external_links);
    println!("  Broken: {}", stats.total_broken_links);
    println!();

    println!("Pages with login form: {}", stats.pages_with_login_form);
}
