//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod seats;
pub mod serve;
pub mod sweep;
pub mod trip;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use seatbook_auth::RandomCodeIssuer;
use seatbook_core::config::{AppConfig, StoreProvider};
use seatbook_core::error::AppError;
use seatbook_core::traits::SystemClock;
use seatbook_database::store::SeatStoreDispatch;
use seatbook_service::ServiceContext;

use crate::output::{self, OutputFormat};

/// Seatbook bus seat holds and bookings
#[derive(Debug, Parser)]
#[command(name = "seatbook", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to load (config/{env}.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Seatbook server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Trip management
    Trip(trip::TripArgs),
    /// Seat layout and seat maps
    Seats(seats::SeatsArgs),
    /// Run one expiry sweep
    Sweep,
    /// Admin credential helpers
    Admin(admin::AdminArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Admin(args) => admin::execute(args),
            Commands::Serve(args) => serve::execute(args, self.load_config()?).await,
            Commands::Migrate(args) => migrate::execute(args, self.load_config()?).await,
            Commands::Trip(args) => trip::execute(args, self.load_config()?, self.format).await,
            Commands::Seats(args) => seats::execute(args, self.load_config()?, self.format).await,
            Commands::Sweep => sweep::execute(self.load_config()?, self.format).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}

/// Helper: open the configured seat store as a service context
pub async fn open_context(config: &AppConfig) -> Result<ServiceContext, AppError> {
    if config.store.provider == StoreProvider::Memory {
        output::print_warning("store.provider is 'memory'; changes will not outlive this command");
    }

    let store = SeatStoreDispatch::from_config(config).await?;
    Ok(ServiceContext::new(
        Arc::new(store.clone()),
        Arc::new(store),
        Arc::new(SystemClock::new()),
        Arc::new(RandomCodeIssuer::new()),
    ))
}
