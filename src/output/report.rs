//! Human and JSON renderings of analysis jobs

use crate::storage::AnalysisJob;

/// Serializes jobs as pretty-printed JSON
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Prints jobs as a JSON array
pub fn print_jobs_json(jobs: &[AnalysisJob]) -> Result<(), serde_json::Error> {
    println!("{}", to_json(jobs)?);
    Ok(())
}

/// Prints one line per job
pub fn print_job_table(jobs: &[AnalysisJob]) {
    if jobs.is_empty() {
        println!("No jobs.");
        return;
    }

    println!(
        "{:>6}  {:<8}  {:>8}  {:>8}  {:>6}  URL",
        "ID", "STATUS", "INTERNAL", "EXTERNAL", "BROKEN"
    );

    for job in jobs {
        let (internal, external, broken) = match &job.metrics {
            Some(m) => (
                m.internal_links.to_string(),
                m.external_links.to_string(),
                m.inaccessible_links.to_string(),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };

        println!(
            "{:>6}  {:<8}  {:>8}  {:>8}  {:>6}  {}",
            job.id, job.status, internal, external, broken, job.url
        );
    }
}

/// Prints one job with its metrics and broken-link details
pub fn print_job(job: &AnalysisJob) {
    println!("Job {}", job.id);
    println!("  URL: {}", job.url);
    println!("  Status: {}", job.status);
    println!("  Created: {}", job.created_at);
    println!("  Updated: {}", job.updated_at);

    if let Some(error) = &job.error_message {
        println!("  Error: {}", error);
    }

    let Some(metrics) = &job.metrics else {
        return;
    };

    println!();
    println!("  HTML version: {}", metrics.html_version);
    println!("  Title: {}", metrics.page_title);

    let h = &metrics.headings;
    println!(
        "  Headings: h1={} h2={} h3={} h4={} h5={} h6={}",
        h.h1, h.h2, h.h3, h.h4, h.h5, h.h6
    );
    println!("  Links: {}", metrics.total_links());
    println!("  Internal links: {}", metrics.internal_links);
    println!("  External links: {}", metrics.external_links);
    println!("  Login form: {}", if metrics.has_login_form { "yes" } else { "no" });
    println!("  Inaccessible links: {}", metrics.inaccessible_links);

    for link in &metrics.broken_links {
        if link.is_transport_failure() {
            println!("    - {} (unreachable)", link.url);
        } else {
            println!("    - {} ({})", link.url, link.status_code);
        }
    }
}
