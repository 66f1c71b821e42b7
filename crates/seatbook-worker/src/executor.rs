//! Job contract.

use async_trait::async_trait;
use serde_json::Value;

use seatbook_core::error::AppError;

/// A unit of background work run on a schedule.
#[async_trait]
pub trait PeriodicJob: Send + Sync + 'static {
    /// Job name used in logs.
    fn name(&self) -> &str;

    /// Run the job once, returning an optional summary.
    async fn run(&self) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from a job run.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Failure that will not go away on the next tick
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Failure the next tick may recover from
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}
