//! Bounded job queue with a fixed-size worker pool
//!
//! Job ids go through a bounded channel to a dispatcher task. The dispatcher
//! takes a semaphore permit before spawning each run, so at most
//! `max_concurrent_jobs` analyses execute at once and a full pool pushes back
//! on `enqueue` through the channel.

use crate::jobs::runner::JobRunner;
use crate::AnalyzerError;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};

/// Handle for submitting job ids to the worker pool
pub struct JobQueue {
    sender: mpsc::Sender<i64>,
    dispatcher: JoinHandle<()>,
}

impl JobQueue {
    /// Spawns the dispatcher task
    ///
    /// Must be called from within a Tokio runtime. Both limits are clamped to
    /// at least 1.
    pub fn start(runner: Arc<JobRunner>, max_concurrent_jobs: usize, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let dispatcher = tokio::spawn(dispatch(runner, receiver, max_concurrent_jobs.max(1)));

        Self { sender, dispatcher }
    }

    /// Queues a job id for execution
    ///
    /// Waits while the intake channel is full.
    pub async fn enqueue(&self, job_id: i64) -> Result<(), AnalyzerError> {
        self.sender
            .send(job_id)
            .await
            .map_err(|_| AnalyzerError::QueueClosed)
    }

    /// Stops accepting jobs and waits for every queued and running job
    pub async fn shutdown(self) {
        drop(self.sender);

        if let Err(e) = self.dispatcher.await {
            tracing::error!("Job dispatcher failed: {}", e);
        }
    }
}

async fn dispatch(runner: Arc<JobRunner>, mut receiver: mpsc::Receiver<i64>, workers: usize) {
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut running = JoinSet::new();

    while let Some(job_id) = receiver.recv().await {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let runner = runner.clone();
        running.spawn(async move {
            let _permit = permit;
            runner.run(job_id).await;
        });

        // Reap finished runs so the set does not grow with history
        while let Some(finished) = running.try_join_next() {
            if let Err(e) = finished {
                tracing::warn!("Job task panicked: {}", e);
            }
        }
    }

    tracing::debug!("Job intake closed, draining {} running jobs", running.len());

    while let Some(finished) = running.join_next().await {
        if let Err(e) = finished {
            tracing::warn!("Job task panicked: {}", e);
        }
    }
}
