//! Runtime selection between store backends.

use async_trait::async_trait;
use tracing::info;

use seatbook_core::config::{AppConfig, StoreProvider};
use seatbook_core::result::AppResult;
use seatbook_core::types::{SeatId, TripId};
use seatbook_entity::seat::{NewSeat, Seat, SeatCommand};
use seatbook_entity::trip::{NewTrip, Trip};

use crate::connection::DatabasePool;
use crate::migration::run_migrations;
use crate::repositories::{SeatRepository, TripRepository};

use super::{CasOutcome, MemoryStore, SeatFilter, SeatStore, TripCatalog};

/// Store backend chosen by `store.provider`.
#[derive(Debug, Clone)]
pub enum SeatStoreDispatch {
    /// Process-local store (single node).
    Memory(MemoryStore),
    /// PostgreSQL store (multi-node).
    Postgres {
        /// Seat repository.
        seats: SeatRepository,
        /// Trip repository.
        trips: TripRepository,
    },
}

impl SeatStoreDispatch {
    /// Build the configured backend, connecting and migrating if needed.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        match config.store.provider {
            StoreProvider::Memory => {
                info!("Using in-memory seat store");
                Ok(Self::Memory(MemoryStore::new()))
            }
            StoreProvider::Postgres => {
                let db = DatabasePool::connect(&config.database).await?;
                if config.database.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                info!("Using PostgreSQL seat store");
                Ok(Self::postgres(&db))
            }
        }
    }

    /// Wrap an existing pool.
    pub fn postgres(db: &DatabasePool) -> Self {
        Self::Postgres {
            seats: SeatRepository::new(db.pool().clone()),
            trips: TripRepository::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl SeatStore for SeatStoreDispatch {
    async fn get(&self, seat_id: SeatId) -> AppResult<Option<Seat>> {
        match self {
            Self::Memory(inner) => inner.get(seat_id).await,
            Self::Postgres { seats, .. } => seats.get(seat_id).await,
        }
    }

    async fn compare_and_set(
        &self,
        seat_id: SeatId,
        command: &SeatCommand,
    ) -> AppResult<CasOutcome> {
        match self {
            Self::Memory(inner) => inner.compare_and_set(seat_id, command).await,
            Self::Postgres { seats, .. } => seats.compare_and_set(seat_id, command).await,
        }
    }

    async fn scan(&self, filter: &SeatFilter) -> AppResult<Vec<Seat>> {
        match self {
            Self::Memory(inner) => inner.scan(filter).await,
            Self::Postgres { seats, .. } => seats.scan(filter).await,
        }
    }

    async fn insert_seats(&self, new_seats: &[NewSeat]) -> AppResult<u64> {
        match self {
            Self::Memory(inner) => inner.insert_seats(new_seats).await,
            Self::Postgres { seats, .. } => seats.insert_seats(new_seats).await,
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self {
            Self::Memory(inner) => inner.health_check().await,
            Self::Postgres { seats, .. } => seats.health_check().await,
        }
    }
}

#[async_trait]
impl TripCatalog for SeatStoreDispatch {
    async fn get_trip(&self, trip_id: TripId) -> AppResult<Option<Trip>> {
        match self {
            Self::Memory(inner) => inner.get_trip(trip_id).await,
            Self::Postgres { trips, .. } => trips.get_trip(trip_id).await,
        }
    }

    async fn list_trips(&self) -> AppResult<Vec<Trip>> {
        match self {
            Self::Memory(inner) => inner.list_trips().await,
            Self::Postgres { trips, .. } => trips.list_trips().await,
        }
    }

    async fn create_trip(&self, trip: NewTrip) -> AppResult<Trip> {
        match self {
            Self::Memory(inner) => inner.create_trip(trip).await,
            Self::Postgres { trips, .. } => trips.create_trip(trip).await,
        }
    }

    async fn set_capacity(&self, trip_id: TripId, capacity: i32) -> AppResult<Trip> {
        match self {
            Self::Memory(inner) => inner.set_capacity(trip_id, capacity).await,
            Self::Postgres { trips, .. } => trips.set_capacity(trip_id, capacity).await,
        }
    }
}
