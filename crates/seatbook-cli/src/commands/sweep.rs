//! One-shot expiry sweep.

use seatbook_core::config::AppConfig;
use seatbook_core::error::AppError;
use seatbook_service::ExpiryService;

use crate::output::{self, OutputFormat};

/// Execute the sweep command
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let ctx = super::open_context(&config).await?;
    let report = ExpiryService::new(ctx, config.sweeper.batch_size)
        .sweep()
        .await?;

    output::print_item(&report, format, |report| {
        output::print_success(&format!("Released {} expired holds", report.expired));
        output::print_kv("Scanned", &report.scanned.to_string());
        output::print_kv("Skipped", &report.skipped.to_string());
        output::print_kv("Failed", &report.failed.to_string());
    });
    Ok(())
}
