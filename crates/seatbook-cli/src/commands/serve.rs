//! Start the Seatbook server.

use clap::Args;

use seatbook_core::config::AppConfig;
use seatbook_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Do not run the expiry sweeper in this process
    #[arg(long)]
    pub no_sweeper: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.no_sweeper {
        config.sweeper.enabled = false;
    }

    println!("Starting Seatbook server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    seatbook_api::run_server(config).await
}
