//! Trip registration and seat layout provisioning.

use serde::{Deserialize, Serialize};
use tracing::info;

use seatbook_core::config::SeedTrip;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::TripId;
use seatbook_database::store::SeatFilter;
use seatbook_entity::seat::NewSeat;
use seatbook_entity::trip::{NewTrip, Trip};

use crate::context::ServiceContext;

/// Rows are lettered `A` to `Z`.
const MAX_ROWS: u32 = 26;

/// Upper bound on seats in one row.
const MAX_SEATS_PER_ROW: u32 = 20;

/// Grid layout to generate for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRequest {
    /// Number of rows, lettered from `A`.
    pub rows: u32,
    /// Seats per row, numbered from 1.
    pub seats_per_row: u32,
    /// Optional label prefix, e.g. `U` for an upper deck.
    #[serde(default)]
    pub prefix: String,
}

impl LayoutRequest {
    /// Seat labels in row-major order: `{prefix}{row}{number}`.
    pub fn labels(&self) -> AppResult<Vec<String>> {
        if !(1..=MAX_ROWS).contains(&self.rows) {
            return Err(AppError::validation(format!(
                "rows must be between 1 and {MAX_ROWS}"
            )));
        }
        if !(1..=MAX_SEATS_PER_ROW).contains(&self.seats_per_row) {
            return Err(AppError::validation(format!(
                "seats_per_row must be between 1 and {MAX_SEATS_PER_ROW}"
            )));
        }
        let normalized = self.prefix.trim().to_ascii_uppercase();
        let prefix = normalized.as_str();
        if prefix.len() > 8 || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::validation(
                "prefix must be at most 8 letters or digits",
            ));
        }

        let labels = (0..self.rows)
            .flat_map(|row| {
                let letter = char::from(b'A' + row as u8);
                (1..=self.seats_per_row).map(move |n| format!("{prefix}{letter}{n}"))
            })
            .collect();
        Ok(labels)
    }
}

/// Result of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    /// Trip provisioned.
    pub trip_id: TripId,
    /// Seats created by this run.
    pub created: u64,
    /// Seats the trip has afterwards.
    pub total: usize,
}

/// Registers trips and generates their seats.
#[derive(Clone)]
pub struct ProvisionService {
    ctx: ServiceContext,
}

impl ProvisionService {
    /// Creates a new provisioning service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a trip.
    pub async fn create_trip(&self, trip: NewTrip) -> AppResult<Trip> {
        if trip.title.trim().is_empty() {
            return Err(AppError::validation("Trip title must not be empty"));
        }
        if trip.origin.trim().is_empty() || trip.destination.trim().is_empty() {
            return Err(AppError::validation("Trip origin and destination are required"));
        }
        if trip.bus_type.trim().is_empty() {
            return Err(AppError::validation("Trip bus type must not be empty"));
        }
        if trip.price < 0 {
            return Err(AppError::validation("Trip price must not be negative"));
        }
        let created = self.ctx.trips.create_trip(trip).await?;
        info!(trip_id = %created.id, title = %created.title, "Trip created");
        Ok(created)
    }

    /// Generate the seats of a grid layout, skipping labels that exist.
    pub async fn generate_layout(
        &self,
        trip_id: TripId,
        layout: &LayoutRequest,
    ) -> AppResult<ProvisionReport> {
        let labels = layout.labels()?;
        if self.ctx.trips.get_trip(trip_id).await?.is_none() {
            return Err(AppError::not_found(format!("Trip {trip_id} not found")));
        }

        let new_seats: Vec<NewSeat> = labels
            .into_iter()
            .map(|code| NewSeat { trip_id, code })
            .collect();
        let created = self.ctx.seats.insert_seats(&new_seats).await?;
        let total = self
            .ctx
            .seats
            .scan(&SeatFilter::new().trip(trip_id))
            .await?
            .len();

        let capacity = i32::try_from(total)
            .map_err(|_| AppError::validation(format!("Trip {trip_id} has too many seats")))?;
        self.ctx.trips.set_capacity(trip_id, capacity).await?;

        info!(trip_id = %trip_id, created, total, "Seat layout provisioned");
        Ok(ProvisionReport {
            trip_id,
            created,
            total,
        })
    }

    /// Create each seeded trip unless one with the same title and departure
    /// exists, then generate its layout.
    pub async fn seed(&self, seeds: &[SeedTrip]) -> AppResult<Vec<ProvisionReport>> {
        let existing = self.ctx.trips.list_trips().await?;
        let mut reports = Vec::with_capacity(seeds.len());

        for seed in seeds {
            let found = existing
                .iter()
                .find(|t| t.title == seed.title && t.departs_at == seed.departs_at);
            let trip_id = match found {
                Some(trip) => trip.id,
                None => {
                    self.create_trip(NewTrip {
                        title: seed.title.clone(),
                        origin: seed.origin.clone(),
                        destination: seed.destination.clone(),
                        departs_at: seed.departs_at,
                        bus_type: seed.bus_type.clone(),
                        price: seed.price,
                        admin_contact: seed.admin_contact.clone(),
                    })
                    .await?
                    .id
                }
            };

            let layout = LayoutRequest {
                rows: seed.rows,
                seats_per_row: seed.seats_per_row,
                prefix: seed.prefix.clone(),
            };
            reports.push(self.generate_layout(trip_id, &layout).await?);
        }

        Ok(reports)
    }
}
