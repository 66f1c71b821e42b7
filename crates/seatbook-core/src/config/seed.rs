//! Trips and seat layouts created at startup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Startup seed data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Trips to create when missing, each with a generated seat grid.
    #[serde(default)]
    pub trips: Vec<SeedTrip>,
}

/// One seeded trip.
///
/// A trip already present with the same title and departure is reused, and
/// only its missing seat labels are generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTrip {
    /// Display title.
    pub title: String,
    /// Departure city.
    pub origin: String,
    /// Arrival city.
    pub destination: String,
    /// Scheduled departure (RFC 3339).
    pub departs_at: DateTime<Utc>,
    /// Seat layout class.
    #[serde(default = "default_bus_type")]
    pub bus_type: String,
    /// Fare per seat in the smallest currency unit.
    pub price: i64,
    /// Admin contact handle.
    #[serde(default)]
    pub admin_contact: Option<String>,
    /// Number of seat rows.
    pub rows: u32,
    /// Seats per row.
    pub seats_per_row: u32,
    /// Seat label prefix.
    #[serde(default)]
    pub prefix: String,
}

fn default_bus_type() -> String {
    "STANDARD".to_string()
}
