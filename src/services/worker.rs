// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Background job queue for webhook-triggered work.
//!
//! The webhook handler acknowledges Strava immediately and hands the work
//! to this queue. Every job runs in its own task; a job that fails or
//! panics is reported on the failure channel returned by [`AnnotationQueue::spawn`].

use crate::error::{AppError, Result};
use crate::services::annotation::{AnnotationPipeline, PipelineError, PipelineOutcome};
use crate::services::UserDeletion;
use futures_util::{stream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

const MAX_CONCURRENT_JOBS: usize = 16;
const QUEUE_CAPACITY: usize = 256;

/// Work item produced by a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Annotate { athlete_id: u64, activity_id: u64 },
    DeleteUser { athlete_id: u64 },
}

/// A job that did not complete.
#[derive(Debug)]
pub struct JobFailure {
    pub job: Job,
    pub reason: String,
}

/// Handle for submitting jobs to the worker.
#[derive(Clone)]
pub struct AnnotationQueue {
    tx: mpsc::Sender<Job>,
}

impl AnnotationQueue {
    /// Start the worker task. Must be called from within a tokio runtime.
    ///
    /// The worker stops once every queue handle has been dropped and the
    /// queued jobs have finished.
    pub fn spawn(
        pipeline: AnnotationPipeline,
        deletion: UserDeletion,
    ) -> (Self, mpsc::UnboundedReceiver<JobFailure>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let (failures_tx, failures_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_worker(
            rx,
            Arc::new(pipeline),
            Arc::new(deletion),
            failures_tx,
        ));

        (Self { tx }, failures_rx)
    }

    /// Queue a job for processing without waiting for room.
    pub fn submit(&self, job: Job) -> Result<()> {
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                AppError::Internal(anyhow::anyhow!("Annotation queue is full"))
            }
            mpsc::error::TrySendError::Closed(_) => {
                AppError::Internal(anyhow::anyhow!("Annotation worker is not running"))
            }
        })
    }
}

async fn run_worker(
    rx: mpsc::Receiver<Job>,
    pipeline: Arc<AnnotationPipeline>,
    deletion: Arc<UserDeletion>,
    failures: mpsc::UnboundedSender<JobFailure>,
) {
    let jobs = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|job| (job, rx)) });

    jobs.for_each_concurrent(MAX_CONCURRENT_JOBS, |job| {
        let pipeline = Arc::clone(&pipeline);
        let deletion = Arc::clone(&deletion);
        let failures = failures.clone();
        async move {
            let reason = match tokio::spawn(execute(job, pipeline, deletion)).await {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(e) if e.is_panic() => Some(format!("job panicked: {}", e)),
                Err(e) => Some(format!("job cancelled: {}", e)),
            };

            if let Some(reason) = reason {
                tracing::warn!(job = ?job, reason = %reason, "Job failed");
                // Nobody listening is fine; the failure is already logged.
                let _ = failures.send(JobFailure { job, reason });
            }
        }
    })
    .await;

    tracing::info!("Annotation worker stopped");
}

async fn execute(
    job: Job,
    pipeline: Arc<AnnotationPipeline>,
    deletion: Arc<UserDeletion>,
) -> std::result::Result<(), PipelineError> {
    match job {
        Job::Annotate {
            athlete_id,
            activity_id,
        } => match pipeline.run(athlete_id, activity_id).await? {
            PipelineOutcome::Skipped(decision) => {
                tracing::info!(athlete_id, activity_id, decision = %decision, "Activity skipped");
                Ok(())
            }
            PipelineOutcome::Done { .. } => Ok(()),
        },
        Job::DeleteUser { athlete_id } => {
            deletion.delete_user(athlete_id).await;
            Ok(())
        }
    }
}
