//! Seat layout and seat map CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use seatbook_core::config::AppConfig;
use seatbook_core::error::AppError;
use seatbook_core::types::TripId;
use seatbook_service::trip::{LayoutRequest, SeatView};
use seatbook_service::{ExpiryService, ProvisionService, SeatMapService};

use crate::output::{self, OutputFormat};

/// Arguments for seat commands
#[derive(Debug, Args)]
pub struct SeatsArgs {
    /// Seat subcommand
    #[command(subcommand)]
    pub command: SeatsCommand,
}

/// Seat subcommands
#[derive(Debug, Subcommand)]
pub enum SeatsCommand {
    /// Generate a grid of seats for a trip (existing labels are kept)
    Generate {
        /// Trip ID
        #[arg(short, long)]
        trip: TripId,
        /// Number of rows, lettered from A
        #[arg(short, long)]
        rows: u32,
        /// Seats per row
        #[arg(short = 'n', long)]
        per_row: u32,
        /// Label prefix, e.g. U for an upper deck
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Show a trip's seat map
    Map {
        /// Trip ID
        #[arg(short, long)]
        trip: TripId,
    },
}

/// Seat display row
#[derive(Debug, Serialize, Tabled)]
struct SeatRow {
    /// Seat label
    code: String,
    /// Status
    status: String,
    /// Hold expiry
    hold_expires_at: String,
}

impl From<&SeatView> for SeatRow {
    fn from(seat: &SeatView) -> Self {
        Self {
            code: seat.code.clone(),
            status: seat.status.to_string(),
            hold_expires_at: seat
                .hold_expires_at
                .map(|t| t.format("%H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute seat commands
pub async fn execute(
    args: &SeatsArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = super::open_context(&config).await?;

    match &args.command {
        SeatsCommand::Generate {
            trip,
            rows,
            per_row,
            prefix,
        } => {
            let layout = LayoutRequest {
                rows: *rows,
                seats_per_row: *per_row,
                prefix: prefix.clone(),
            };
            let report = ProvisionService::new(ctx)
                .generate_layout(*trip, &layout)
                .await?;

            output::print_item(&report, format, |report| {
                output::print_success(&format!(
                    "Created {} seats ({} total)",
                    report.created, report.total
                ));
            });
        }
        SeatsCommand::Map { trip } => {
            let expiry = ExpiryService::new(ctx.clone(), config.sweeper.batch_size);
            let map = SeatMapService::new(ctx, expiry).seat_map(*trip).await?;

            output::print_item(&map, format, |map| {
                output::print_kv("Trip", &map.trip.title);
                output::print_kv("Available", &format!("{}/{}", map.available, map.seats.len()));
                let rows: Vec<SeatRow> = map.seats.iter().map(SeatRow::from).collect();
                output::print_list(&rows, OutputFormat::Table);
            });
        }
    }

    Ok(())
}
