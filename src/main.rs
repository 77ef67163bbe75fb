//! Page Analyzer main entry point
//!
//! This is the command-line interface for the page analyzer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use page_analyzer::config::{load_config_or_default, Config};
use page_analyzer::jobs::{AnalysisService, SubmitOutcome};
use page_analyzer::output::{
    print_job, print_job_table, print_jobs_json, print_statistics, to_json,
};
use page_analyzer::AnalysisJob;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page Analyzer: single-page HTML analysis with broken-link detection
///
/// Each submitted URL becomes a job. A job fetches the page, reports its HTML
/// version, title, heading counts and login-form presence, classifies its
/// links as internal or external and probes every link for reachability.
#[derive(Parser, Debug)]
#[command(name = "page-analyzer")]
#[command(version)]
#[command(about = "Analyze web pages and find broken links", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit URLs for analysis and wait for the results
    Submit {
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },

    /// List all jobs, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one job with its broken links
    Show {
        id: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Re-run finished jobs and wait for the results
    Rerun {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<i64>,
    },

    /// Delete jobs
    Delete {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<i64>,
    },

    /// Show job counts and link totals
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => {
            tracing::debug!("Configuration loaded: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Submit { urls } => handle_submit(&config, &urls).await?,
        Command::List { json } => handle_list(&config, json).await?,
        Command::Show { id, json } => handle_show(&config, id, json).await?,
        Command::Rerun { ids } => handle_rerun(&config, &ids).await?,
        Command::Delete { ids } => handle_delete(&config, &ids).await?,
        Command::Stats => handle_stats(&config).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_analyzer=info,warn"),
            1 => EnvFilter::new("page_analyzer=debug,info"),
            2 => EnvFilter::new("page_analyzer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_service(config: &Config) -> anyhow::Result<AnalysisService> {
    AnalysisService::from_config(config)
        .with_context(|| format!("failed to open database {}", config.storage.database_path))
}

/// Handles `submit`: queues every URL, waits for the queue to drain, prints the jobs
async fn handle_submit(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    let service = open_service(config)?;

    let mut ids = Vec::with_capacity(urls.len());
    for url in urls {
        match service.submit(url).await {
            Ok(SubmitOutcome::Created(job)) => ids.push(job.id),
            Ok(SubmitOutcome::Existing(job)) => {
                println!("{} already submitted as job {} ({})", url, job.id, job.status);
                ids.push(job.id);
            }
            Err(e) => tracing::error!("Rejected {}: {}", url, e),
        }
    }

    let jobs = service_snapshot(service, &ids).await?;
    print_job_table(&jobs);
    ensure_any_accepted(&ids, urls.len())
}

/// Fails when none of the submitted URLs produced a job
fn ensure_any_accepted(ids: &[i64], submitted: usize) -> anyhow::Result<()> {
    if ids.is_empty() && submitted > 0 {
        anyhow::bail!("none of the {} submitted URL(s) was accepted", submitted);
    }
    Ok(())
}

/// Waits for the queue to drain, then reloads the given jobs in their final state
async fn service_snapshot(
    service: AnalysisService,
    ids: &[i64],
) -> anyhow::Result<Vec<AnalysisJob>> {
    let store = service.store();
    tracing::debug!("Waiting for {} job(s) to finish", ids.len());
    service.shutdown().await;

    let mut jobs = Vec::with_capacity(ids.len());
    for &id in ids {
        // Jobs deleted by a concurrent process are left out
        if let Some(job) = store
            .find_by_id(id)
            .with_context(|| format!("failed to reload job {}", id))?
        {
            if !job.status.is_terminal() {
                tracing::warn!(
                    "Job {} is still {} after the queue drained",
                    job.id,
                    job.status
                );
            }
            jobs.push(job);
        }
    }
    Ok(jobs)
}

/// Handles `list`
async fn handle_list(config: &Config, json: bool) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let jobs = service.list()?;
    service.shutdown().await;

    if json {
        print_jobs_json(&jobs)?;
    } else {
        print_job_table(&jobs);
    }
    Ok(())
}

/// Handles `show`
async fn handle_show(config: &Config, id: i64, json: bool) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let job = service.get(id);
    service.shutdown().await;
    let job = job?;

    if json {
        println!("{}", to_json(&job)?);
    } else {
        print_job(&job);
    }
    Ok(())
}

/// Handles `rerun`: re-queues eligible jobs and waits for them
async fn handle_rerun(config: &Config, ids: &[i64]) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let summary = service.rerun(ids).await?;

    for id in &summary.skipped {
        println!("Skipped job {} (unknown or still in flight)", id);
    }

    let jobs = service_snapshot(service, &summary.requeued).await?;
    print_job_table(&jobs);
    Ok(())
}

/// Handles `delete`
async fn handle_delete(config: &Config, ids: &[i64]) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let removed = service.delete(ids);
    service.shutdown().await;

    println!("Deleted {} job(s)", removed?);
    Ok(())
}

/// Handles `stats`
async fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let service = open_service(config)?;
    let stats = service.statistics();
    service.shutdown().await;

    print_statistics(&stats?);
    Ok(())
}
