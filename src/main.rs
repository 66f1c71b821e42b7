//! Seatbook server: bus seat holds, claims, and admin bookings.
//!
//! Main entry point that loads configuration, installs logging, and hands
//! off to the API crate.

use tracing_subscriber::{EnvFilter, fmt};

use seatbook_core::config::AppConfig;
use seatbook_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = seatbook_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `SEATBOOK_CONFIG_DIR` (default `config`) with the
/// `SEATBOOK_ENV` overlay (default `development`)
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("SEATBOOK_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("SEATBOOK_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_from(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
