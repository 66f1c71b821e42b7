//! Per-seat results shared by batch operations.

use serde::Serialize;

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::types::SeatId;
use seatbook_entity::seat::SeatStatus;

/// A seat a batch operation could not apply to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatFailure {
    /// Seat concerned.
    pub seat_id: SeatId,
    /// Seat label.
    pub seat_code: String,
    /// Error category, normally `Conflict`.
    pub error: ErrorKind,
    /// Status the seat was found in, when known.
    pub status: Option<SeatStatus>,
    /// Human-readable reason.
    pub message: String,
}

impl SeatFailure {
    /// Failure carrying the seat's observed status.
    pub fn conflict(seat_id: SeatId, seat_code: &str, status: SeatStatus, message: String) -> Self {
        Self {
            seat_id,
            seat_code: seat_code.to_string(),
            error: ErrorKind::Conflict,
            status: Some(status),
            message,
        }
    }

    /// Failure caused by an error for this seat only.
    pub fn from_error(seat_id: SeatId, seat_code: &str, err: &AppError) -> Self {
        Self {
            seat_id,
            seat_code: seat_code.to_string(),
            error: err.kind,
            status: None,
            message: err.message.clone(),
        }
    }
}

/// Remove duplicate ids, keeping the first occurrence.
pub(crate) fn dedupe(seat_ids: &[SeatId]) -> Vec<SeatId> {
    let mut unique = Vec::with_capacity(seat_ids.len());
    for id in seat_ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}
