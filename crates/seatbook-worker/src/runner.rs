//! Job runner: ticks a periodic job until the cancel signal is received.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing;

use crate::executor::{JobExecutionError, PeriodicJob};

/// Runs one job on a fixed interval.
pub struct JobRunner {
    /// Job to run
    job: Arc<dyn PeriodicJob>,
    /// Time between runs
    period: Duration,
}

impl std::fmt::Debug for JobRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("job", &self.job.name())
            .field("period", &self.period)
            .finish()
    }
}

impl JobRunner {
    /// Create a new runner
    pub fn new(job: Arc<dyn PeriodicJob>, period: Duration) -> Self {
        Self {
            job,
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Run the job immediately and then every period, until `cancel` turns
    /// true or its sender is dropped. A run in progress is finished first.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Job runner '{}' started with period={}s",
            self.job.name(),
            self.period.as_secs_f64()
        );

        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *cancel.borrow() {
                break;
            }
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Job runner '{}' received shutdown signal", self.job.name());
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }

        tracing::info!("Job runner '{}' shut down complete", self.job.name());
    }

    /// Run the job once and log the outcome. Failures never stop the runner.
    pub async fn run_once(&self) {
        let started = Instant::now();
        let name = self.job.name();

        match self.job.run().await {
            Ok(Some(summary)) => {
                tracing::info!(
                    job = name,
                    duration_ms = started.elapsed().as_millis() as u64,
                    summary = %summary,
                    "Job completed"
                );
            }
            Ok(None) => {
                tracing::debug!(job = name, "Job completed with nothing to do");
            }
            Err(JobExecutionError::Transient(msg)) => {
                tracing::warn!(job = name, "Job failed, retrying next tick: {}", msg);
            }
            Err(e) => {
                tracing::error!(job = name, "Job failed: {}", e);
            }
        }
    }
}
