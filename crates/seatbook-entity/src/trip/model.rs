//! Trip entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use seatbook_core::types::TripId;
use sqlx::FromRow;

/// A scheduled bus departure owning a fixed set of seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Trip {
    /// Unique trip identifier.
    pub id: TripId,
    /// Display title, e.g. `Jakarta → Bandung (Executive)`.
    pub title: String,
    /// Departure city.
    pub origin: String,
    /// Arrival city.
    pub destination: String,
    /// Scheduled departure.
    pub departs_at: DateTime<Utc>,
    /// Seat layout class, e.g. `EXEC` or `SLEEPER`.
    pub bus_type: String,
    /// Fare per seat in the smallest currency unit.
    pub price: i64,
    /// Number of provisioned seats.
    pub capacity_total: i32,
    /// Handle travellers message to confirm payment (e.g. a WhatsApp number).
    pub admin_contact: Option<String>,
    /// Whether the trip accepts new holds.
    pub is_active: bool,
    /// When the trip was created.
    pub created_at: DateTime<Utc>,
}

/// Data needed to register a trip.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrip {
    /// Display title.
    pub title: String,
    /// Departure city.
    pub origin: String,
    /// Arrival city.
    pub destination: String,
    /// Scheduled departure.
    pub departs_at: DateTime<Utc>,
    /// Seat layout class.
    pub bus_type: String,
    /// Fare per seat in the smallest currency unit.
    pub price: i64,
    /// Admin contact handle.
    pub admin_contact: Option<String>,
}
