//! Seat store and trip catalog contracts.
//!
//! Every seat write goes through [`SeatStore::compare_and_set`], which
//! checks a [`SeatCommand`]'s guard and writes its transition as one
//! indivisible step. Two implementations are provided:
//! - [`MemoryStore`] (single node, `DashMap` entry locks)
//! - [`SeatRepository`](crate::repositories::SeatRepository) (PostgreSQL
//!   conditional `UPDATE … RETURNING`)

pub mod dispatch;
pub mod filter;
pub mod memory;

use async_trait::async_trait;

use seatbook_core::result::AppResult;
use seatbook_core::types::{SeatId, TripId};
use seatbook_entity::seat::{GuardViolation, NewSeat, Seat, SeatCommand};
use seatbook_entity::trip::{NewTrip, Trip};

pub use dispatch::SeatStoreDispatch;
pub use filter::SeatFilter;
pub use memory::MemoryStore;

/// Result of a compare-and-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasOutcome {
    /// The guard held and the seat now has this value.
    Applied(Seat),
    /// The guard failed; nothing was written.
    Rejected {
        /// Seat as observed when the guard failed.
        current: Seat,
        /// Why the guard failed.
        violation: GuardViolation,
    },
}

impl CasOutcome {
    /// Whether the write happened.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Linearizable per-seat storage.
#[async_trait]
pub trait SeatStore: Send + Sync + 'static {
    /// Read one seat.
    async fn get(&self, seat_id: SeatId) -> AppResult<Option<Seat>>;

    /// Atomically evaluate `command`'s guard and, if it holds, write its
    /// transition.
    ///
    /// Returns a `NotFound` error when the seat does not exist.
    async fn compare_and_set(&self, seat_id: SeatId, command: &SeatCommand)
    -> AppResult<CasOutcome>;

    /// List seats matching `filter`, ordered by trip then seat code.
    ///
    /// Results are a snapshot and may be stale by the time they are used.
    async fn scan(&self, filter: &SeatFilter) -> AppResult<Vec<Seat>>;

    /// Insert available seats, skipping codes that already exist on the
    /// trip. Returns the number of seats created.
    async fn insert_seats(&self, seats: &[NewSeat]) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Read access to trips, plus creation for bootstrapping.
#[async_trait]
pub trait TripCatalog: Send + Sync + 'static {
    /// Look up a trip.
    async fn get_trip(&self, trip_id: TripId) -> AppResult<Option<Trip>>;

    /// List trips by departure time.
    async fn list_trips(&self) -> AppResult<Vec<Trip>>;

    /// Register a trip.
    async fn create_trip(&self, trip: NewTrip) -> AppResult<Trip>;

    /// Record how many seats a trip has.
    ///
    /// Returns a `NotFound` error when the trip does not exist.
    async fn set_capacity(&self, trip_id: TripId, capacity: i32) -> AppResult<Trip>;
}
