//! Trip management CLI commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use seatbook_core::config::AppConfig;
use seatbook_core::error::AppError;
use seatbook_entity::trip::{NewTrip, Trip};
use seatbook_service::ProvisionService;

use crate::output::{self, OutputFormat};

/// Arguments for trip commands
#[derive(Debug, Args)]
pub struct TripArgs {
    /// Trip subcommand
    #[command(subcommand)]
    pub command: TripCommand,
}

/// Trip subcommands
#[derive(Debug, Subcommand)]
pub enum TripCommand {
    /// List trips
    List,
    /// Register a trip
    Create {
        /// Display title
        #[arg(short, long)]
        title: String,
        /// Departure city
        #[arg(long)]
        origin: String,
        /// Arrival city
        #[arg(long)]
        destination: String,
        /// Departure time (RFC 3339, e.g. 2026-03-02T07:30:00+07:00)
        #[arg(long, value_parser = parse_departure)]
        departs_at: DateTime<Utc>,
        /// Seat layout class, e.g. EXEC or SLEEPER
        #[arg(long, default_value = "STANDARD")]
        bus_type: String,
        /// Fare per seat in the smallest currency unit
        #[arg(long)]
        price: i64,
        /// Handle travellers message to confirm payment
        #[arg(long)]
        admin_contact: Option<String>,
    },
}

/// Trip display row
#[derive(Debug, Serialize, Tabled)]
struct TripRow {
    /// Trip ID
    id: String,
    /// Title
    title: String,
    /// Route
    route: String,
    /// Departure
    departs_at: String,
    /// Bus type
    bus_type: String,
    /// Fare
    price: i64,
    /// Seats
    seats: i32,
    /// Admin contact
    admin_contact: String,
    /// Accepting holds
    active: String,
}

impl From<&Trip> for TripRow {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.to_string(),
            title: trip.title.clone(),
            route: format!("{} → {}", trip.origin, trip.destination),
            departs_at: trip.departs_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            bus_type: trip.bus_type.clone(),
            price: trip.price,
            seats: trip.capacity_total,
            admin_contact: trip.admin_contact.clone().unwrap_or_else(|| "-".to_string()),
            active: if trip.is_active { "yes" } else { "no" }.to_string(),
        }
    }
}

fn parse_departure(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp: {e}"))
}

/// Execute trip commands
pub async fn execute(
    args: &TripArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = super::open_context(&config).await?;

    match &args.command {
        TripCommand::List => {
            let trips = ctx.trips.list_trips().await?;
            let rows: Vec<TripRow> = trips.iter().map(TripRow::from).collect();
            output::print_list(&rows, format);
        }
        TripCommand::Create {
            title,
            origin,
            destination,
            departs_at,
            bus_type,
            price,
            admin_contact,
        } => {
            let trip = ProvisionService::new(ctx)
                .create_trip(NewTrip {
                    title: title.clone(),
                    origin: origin.clone(),
                    destination: destination.clone(),
                    departs_at: *departs_at,
                    bus_type: bus_type.trim().to_ascii_uppercase(),
                    price: *price,
                    admin_contact: admin_contact.clone(),
                })
                .await?;

            output::print_item(&trip, format, |trip| {
                output::print_success(&format!("Trip '{}' created", trip.title));
                output::print_kv("ID", &trip.id.to_string());
            });
        }
    }

    Ok(())
}
