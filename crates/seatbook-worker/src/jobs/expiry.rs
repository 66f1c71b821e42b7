//! Expiry sweep job.

use async_trait::async_trait;
use serde_json::Value;

use seatbook_core::error::ErrorKind;
use seatbook_service::ExpiryService;

use crate::executor::{JobExecutionError, PeriodicJob};

/// Returns elapsed holds to availability.
#[derive(Clone)]
pub struct ExpirySweepJob {
    expiry: ExpiryService,
}

impl ExpirySweepJob {
    /// Create a new expiry sweep job
    pub fn new(expiry: ExpiryService) -> Self {
        Self { expiry }
    }
}

#[async_trait]
impl PeriodicJob for ExpirySweepJob {
    fn name(&self) -> &str {
        "expiry_sweep"
    }

    async fn run(&self) -> Result<Option<Value>, JobExecutionError> {
        let report = self.expiry.sweep().await.map_err(|e| match e.kind {
            ErrorKind::Database | ErrorKind::ServiceUnavailable => {
                JobExecutionError::Transient(e.to_string())
            }
            _ => JobExecutionError::Internal(e),
        })?;

        if report.expired == 0 && report.failed == 0 {
            return Ok(None);
        }
        Ok(Some(serde_json::to_value(&report).map_err(|e| {
            JobExecutionError::Permanent(format!("Failed to encode sweep report: {e}"))
        })?))
    }
}
