//! Public seat map for a trip.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::{SeatId, TripId};
use seatbook_database::store::SeatFilter;
use seatbook_entity::seat::{Seat, SeatStatus};
use seatbook_entity::trip::Trip;

use crate::context::ServiceContext;
use crate::expiry::ExpiryService;

/// Public view of one seat. Never carries tokens or codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    /// Seat identifier.
    pub id: SeatId,
    /// Seat label.
    pub code: String,
    /// Current status.
    pub status: SeatStatus,
    /// Hold expiry, for held seats.
    pub hold_expires_at: Option<DateTime<Utc>>,
}

impl From<&Seat> for SeatView {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id,
            code: seat.code.clone(),
            status: seat.status(),
            hold_expires_at: seat.hold_lock().map(|lock| lock.expires_at),
        }
    }
}

/// Trip summary with every seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatMap {
    /// The trip.
    pub trip: Trip,
    /// Seats in natural label order.
    pub seats: Vec<SeatView>,
    /// Number of available seats.
    pub available: usize,
}

/// Builds seat maps.
#[derive(Clone)]
pub struct SeatMapService {
    ctx: ServiceContext,
    expiry: ExpiryService,
}

impl SeatMapService {
    /// Creates a new seat map service.
    pub fn new(ctx: ServiceContext, expiry: ExpiryService) -> Self {
        Self { ctx, expiry }
    }

    /// Seat map of a trip, after releasing any elapsed holds on it.
    pub async fn seat_map(&self, trip_id: TripId) -> AppResult<SeatMap> {
        let trip = self
            .ctx
            .trips
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trip {trip_id} not found")))?;

        self.expiry.sweep_trip(trip_id).await?;

        let mut seats: Vec<SeatView> = self
            .ctx
            .seats
            .scan(&SeatFilter::new().trip(trip_id))
            .await?
            .iter()
            .map(SeatView::from)
            .collect();
        seats.sort_by(|a, b| natural_cmp(&a.code, &b.code));

        let available = seats
            .iter()
            .filter(|s| s.status == SeatStatus::Available)
            .count();

        Ok(SeatMap {
            trip,
            seats,
            available,
        })
    }
}

/// Compare seat labels so that `A2` sorts before `A10`.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a_prefix, a_num) = split_label(a);
    let (b_prefix, b_num) = split_label(b);
    a_prefix
        .cmp(b_prefix)
        .then(a_num.cmp(&b_num))
        .then_with(|| a.cmp(b))
}

fn split_label(label: &str) -> (&str, Option<u32>) {
    let digits_at = label
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(label.len());
    let (prefix, digits) = label.split_at(digits_at);
    (prefix, digits.parse().ok())
}
