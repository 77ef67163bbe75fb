//! Concurrent link validation
//!
//! Every link gets its own probe task (fan-out). Probes report broken links
//! into one bounded channel; a supervisor task joins all probes and then drops
//! the last sender, which closes the channel. The caller drains the channel
//! until it is closed (fan-in), so the report is complete exactly when the
//! slowest probe has finished.
//!
//! A semaphore caps how many probes are in flight at once.

use crate::config::AnalyzerConfig;
use crate::crawler::fetcher::probe_link;
use crate::crawler::result::BrokenLink;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Aggregated outcome of validating a batch of links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Broken links in the order their probes reported back
    pub broken_links: Vec<BrokenLink>,

    /// Number of links submitted for probing
    pub probed: usize,
}

impl ValidationReport {
    /// Number of broken links found
    pub fn inaccessible(&self) -> u32 {
        self.broken_links.len() as u32
    }
}

/// Probes links with HEAD requests and collects the broken ones
#[derive(Debug, Clone)]
pub struct LinkValidator {
    client: Client,
    max_concurrent_probes: usize,
    channel_capacity: usize,
}

impl LinkValidator {
    /// Creates a validator sharing the given HTTP client
    ///
    /// Both limits are clamped to at least 1.
    pub fn new(client: Client, max_concurrent_probes: usize, channel_capacity: usize) -> Self {
        Self {
            client,
            max_concurrent_probes: max_concurrent_probes.max(1),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Creates a validator with limits taken from the analyzer configuration
    pub fn from_config(client: Client, config: &AnalyzerConfig) -> Self {
        Self::new(
            client,
            config.max_concurrent_probes as usize,
            config.probe_channel_capacity as usize,
        )
    }

    /// Probes every link and returns once all probes have completed
    ///
    /// A failing probe never aborts the batch: transport errors are recorded
    /// with status `0`, HTTP statuses of 400 and above with their code, and
    /// anything below 400 is dropped.
    pub async fn validate(&self, links: Vec<String>) -> ValidationReport {
        let probed = links.len();
        let (tx, mut rx) = mpsc::channel::<BrokenLink>(self.channel_capacity);
        let permits = Arc::new(Semaphore::new(self.max_concurrent_probes));
        let mut probes = JoinSet::new();

        for link in links {
            let client = self.client.clone();
            let permits = Arc::clone(&permits);
            let tx = tx.clone();

            probes.spawn(async move {
                let Ok(permit) = permits.acquire_owned().await else {
                    return;
                };
                let outcome = probe_link(&client, &link).await;
                drop(permit);

                tracing::debug!("Probed {}: {:?}", link, outcome);

                if let Some(status_code) = outcome.broken_status_code() {
                    let broken = BrokenLink {
                        url: link,
                        status_code,
                    };
                    if tx.send(broken).await.is_err() {
                        tracing::warn!("Broken-link receiver dropped before probe finished");
                    }
                }
            });
        }

        // The supervisor holds the last sender; dropping it after the join
        // barrier is the end-of-stream signal for the drain loop below.
        let supervisor = tokio::spawn(async move {
            while let Some(joined) = probes.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!("Link probe task failed: {}", e);
                }
            }
            drop(tx);
        });

        let mut report = ValidationReport {
            broken_links: Vec::new(),
            probed,
        };
        while let Some(broken) = rx.recv().await {
            report.broken_links.push(broken);
        }

        if let Err(e) = supervisor.await {
            tracing::warn!("Link probe supervisor failed: {}", e);
        }

        tracing::debug!(
            "Validated {} links, {} broken",
            report.probed,
            report.inaccessible()
        );

        report
    }
}
