//! Response DTOs.

use serde::Serialize;

use seatbook_core::types::SeatId;
use seatbook_entity::seat::SeatStatus;
use seatbook_entity::session::SessionHoldSet;
use seatbook_service::claim::ClaimedHold;
use seatbook_service::hold::HoldBatch;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Whether the seat store answered.
    pub store: bool,
}

/// Hold result plus the session the client should keep.
#[derive(Debug, Clone, Serialize)]
pub struct HoldResponse {
    /// Per-seat results.
    #[serde(flatten)]
    pub batch: HoldBatch,
    /// Previous session merged with the new holds.
    pub session: SessionHoldSet,
}

/// Released seat.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseResponse {
    /// Seat released.
    pub seat_id: SeatId,
    /// Status after the release.
    pub status: SeatStatus,
}

/// Recovered holds plus a session to resume with.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimResponse {
    /// Recovered holds.
    #[serde(flatten)]
    pub hold: ClaimedHold,
    /// Session rebuilt from the recovered tokens.
    pub session: SessionHoldSet,
}
