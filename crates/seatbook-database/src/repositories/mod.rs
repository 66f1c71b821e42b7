//! PostgreSQL repository implementations.

pub mod seat;
pub mod trip;

use seatbook_core::error::{AppError, ErrorKind};

pub use seat::SeatRepository;
pub use trip::TripRepository;

/// Map a failed query, treating an exhausted or closed pool as an outage.
pub(crate) fn query_error(err: sqlx::Error, message: &str) -> AppError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            AppError::service_unavailable(format!("{message}: database pool unavailable"))
        }
        other => AppError::with_source(ErrorKind::Database, message, other),
    }
}
