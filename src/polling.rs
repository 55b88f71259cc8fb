//! Analysis job polling
//!
//! A job moves through an explicit state machine:
//!
//! ```text
//!   Queued ──► Running ──► Terminal(Succeeded | Failed | Cancelled | Other)
//!     │                        ▲
//!     └────────────────────────┘
//! ```
//!
//! The poller is a scheduled tokio task that requests the job status once
//! per interval while the job is queued or running. It stops scheduling
//! requests as soon as a terminal state is observed, the handle is
//! cancelled, or the handle is dropped.

use std::sync::Arc;

use kyc_types::JobStatus;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::config::PollingConfig;
use crate::error::{DashboardError, Result};
use crate::resources::Dashboard;

/// How a job ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
    Cancelled,
    /// Any state the dashboard does not know; polling stops on it too
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPhase {
    Queued,
    Running,
    Terminal(JobOutcome),
}

impl JobPhase {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "QUEUED" => Self::Queued,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Terminal(JobOutcome::Succeeded),
            "FAILED" => Self::Terminal(JobOutcome::Failed),
            "CANCELLED" => Self::Terminal(JobOutcome::Cancelled),
            other => Self::Terminal(JobOutcome::Other(other.to_string())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

/// What subscribers see after every poll
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub phase: JobPhase,
    pub status: Option<Arc<JobStatus>>,
    /// Requests issued so far
    pub polls: u32,
}

/// Handle to a running poller. Dropping it stops the poller.
pub struct JobPollHandle {
    job_id: String,
    snapshots: watch::Receiver<JobSnapshot>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<Result<Arc<JobStatus>>>,
}

impl JobPollHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Receiver that yields a new snapshot after every poll
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> JobSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Stop scheduling further requests
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the terminal job status
    pub async fn wait(self) -> Result<Arc<JobStatus>> {
        let Self {
            job_id,
            cancel,
            task,
            ..
        } = self;
        let result = task.await.map_err(|e| DashboardError::JobPoll {
            job_id,
            reason: format!("poller task failed: {e}"),
        })?;
        drop(cancel);
        result
    }
}

pub struct JobPoller;

impl JobPoller {
    /// Start polling `job_id` on the configured interval. The first request
    /// is issued immediately.
    pub fn spawn(
        dashboard: Dashboard,
        job_id: impl Into<String>,
        config: &PollingConfig,
    ) -> JobPollHandle {
        let job_id = job_id.into();
        let (snapshot_tx, snapshot_rx) = watch::channel(JobSnapshot {
            phase: JobPhase::Queued,
            status: None,
            polls: 0,
        });
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let task = tokio::spawn(run_poller(
            dashboard,
            job_id.clone(),
            config.clone(),
            snapshot_tx,
            cancel_rx,
        ));

        JobPollHandle {
            job_id,
            snapshots: snapshot_rx,
            cancel: cancel_tx,
            task,
        }
    }
}

async fn run_poller(
    dashboard: Dashboard,
    job_id: String,
    config: PollingConfig,
    snapshots: watch::Sender<JobSnapshot>,
    mut cancel: watch::Receiver<bool>,
) -> Result<Arc<JobStatus>> {
    let mut ticker = tokio::time::interval(config.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut phase = JobPhase::Queued;
    let mut polls = 0u32;
    let mut consecutive_errors = 0u32;

    info!(job_id = %job_id, interval_ms = config.interval_ms, "Job polling started");

    loop {
        tokio::select! {
            biased;
            // Err means the handle was dropped
            _ = cancel.changed() => {
                info!(job_id = %job_id, polls, "Job polling cancelled");
                return Err(DashboardError::JobPoll {
                    job_id,
                    reason: "cancelled".to_string(),
                });
            }
            _ = ticker.tick() => {}
        }

        polls += 1;
        match dashboard.job_status(&job_id).await {
            Ok(status) => {
                consecutive_errors = 0;
                let next = JobPhase::from_wire(&status.status);
                if next != phase {
                    info!(job_id = %job_id, from = ?phase, to = ?next, "Job phase changed");
                    phase = next;
                }
                snapshots.send_replace(JobSnapshot {
                    phase: phase.clone(),
                    status: Some(Arc::clone(&status)),
                    polls,
                });

                if let JobPhase::Terminal(outcome) = &phase {
                    if *outcome == JobOutcome::Succeeded {
                        dashboard.on_job_succeeded(status.corp_id.as_deref()).await;
                    }
                    info!(job_id = %job_id, polls, outcome = ?outcome, "Job polling finished");
                    return Ok(status);
                }
            }
            Err(e) => {
                consecutive_errors += 1;
                warn!(job_id = %job_id, error = %e, consecutive_errors, "Job status poll failed");
                snapshots.send_modify(|snapshot| snapshot.polls = polls);
                if consecutive_errors >= config.max_consecutive_errors {
                    return Err(DashboardError::JobPoll {
                        job_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}
