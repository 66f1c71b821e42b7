//! PostgreSQL trip catalog.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::TripId;
use seatbook_entity::trip::{NewTrip, Trip};

use super::query_error;
use crate::store::TripCatalog;

/// Repository for trip lookups.
#[derive(Debug, Clone)]
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    /// Create a new trip repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripCatalog for TripRepository {
    async fn get_trip(&self, trip_id: TripId) -> AppResult<Option<Trip>> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error(e, "Failed to find trip"))
    }

    async fn list_trips(&self) -> AppResult<Vec<Trip>> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips ORDER BY departs_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error(e, "Failed to list trips"))
    }

    async fn create_trip(&self, trip: NewTrip) -> AppResult<Trip> {
        sqlx::query_as::<_, Trip>(
            "INSERT INTO trips (id, title, origin, destination, departs_at, bus_type, price, \
             capacity_total, admin_contact, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, TRUE, $9) RETURNING *",
        )
        .bind(TripId::new())
        .bind(&trip.title)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.departs_at)
        .bind(&trip.bus_type)
        .bind(trip.price)
        .bind(&trip.admin_contact)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error(e, "Failed to create trip"))
    }

    async fn set_capacity(&self, trip_id: TripId, capacity: i32) -> AppResult<Trip> {
        sqlx::query_as::<_, Trip>(
            "UPDATE trips SET capacity_total = $2 WHERE id = $1 RETURNING *",
        )
        .bind(trip_id)
        .bind(capacity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error(e, "Failed to update trip capacity"))?
        .ok_or_else(|| AppError::not_found(format!("Trip {trip_id} not found")))
    }
}
