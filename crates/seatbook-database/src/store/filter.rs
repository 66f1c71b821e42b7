//! Seat scan filter.

use chrono::{DateTime, Utc};

use seatbook_core::types::{SeatId, TripId};
use seatbook_entity::seat::{BookingCode, ClaimCode, Seat, SeatState, SeatStatus};

/// Conjunctive filter for [`SeatStore::scan`](super::SeatStore::scan).
///
/// Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatFilter {
    /// Restrict to one trip.
    pub trip_id: Option<TripId>,
    /// Restrict to these seats.
    pub seat_ids: Option<Vec<SeatId>>,
    /// Restrict to one status.
    pub status: Option<SeatStatus>,
    /// Held seats carrying this claim code.
    pub claim_code: Option<ClaimCode>,
    /// Booked seats carrying this booking code.
    pub booking_code: Option<BookingCode>,
    /// Held seats whose hold elapsed at or before this instant.
    pub expired_at: Option<DateTime<Utc>>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

impl SeatFilter {
    /// Filter matching every seat.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats of one trip.
    pub fn trip(mut self, trip_id: TripId) -> Self {
        self.trip_id = Some(trip_id);
        self
    }

    /// Seats with the given ids.
    pub fn seats(mut self, seat_ids: impl IntoIterator<Item = SeatId>) -> Self {
        self.seat_ids = Some(seat_ids.into_iter().collect());
        self
    }

    /// Seats in one status.
    pub fn status(mut self, status: SeatStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Held seats carrying a claim code.
    pub fn claim_code(mut self, code: ClaimCode) -> Self {
        self.claim_code = Some(code);
        self
    }

    /// Booked seats carrying a booking code.
    pub fn booking_code(mut self, code: BookingCode) -> Self {
        self.booking_code = Some(code);
        self
    }

    /// Held seats whose hold elapsed at or before `now`.
    pub fn expired_at(mut self, now: DateTime<Utc>) -> Self {
        self.expired_at = Some(now);
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the filter against one seat.
    pub fn matches(&self, seat: &Seat) -> bool {
        if self.trip_id.is_some_and(|t| t != seat.trip_id) {
            return false;
        }
        if let Some(ids) = &self.seat_ids {
            if !ids.contains(&seat.id) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != seat.status()) {
            return false;
        }
        if let Some(code) = &self.claim_code {
            if seat.hold_lock().is_none_or(|lock| &lock.claim_code != code) {
                return false;
            }
        }
        if let Some(code) = &self.booking_code {
            match &seat.state {
                SeatState::Booked(booking) if &booking.booking_code == code => {}
                _ => return false,
            }
        }
        if let Some(now) = self.expired_at {
            if !seat.is_hold_expired(now) {
                return false;
            }
        }
        true
    }
}
