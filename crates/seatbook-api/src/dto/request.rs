//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use seatbook_core::types::SeatId;
use seatbook_entity::session::{HeldSeat, SessionHoldSet};

/// Hold request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HoldSeatsRequest {
    /// Seats to hold.
    #[validate(length(min = 1, max = 32, message = "Between 1 and 32 seats may be requested"))]
    pub seat_ids: Vec<SeatId>,
    /// Holds the session already owns.
    #[serde(default)]
    #[validate(length(max = 64, message = "At most 64 session holds may be presented"))]
    pub session: Vec<HeldSeat>,
}

impl HoldSeatsRequest {
    /// Session holds as a deduplicated set.
    pub fn session(&self) -> SessionHoldSet {
        SessionHoldSet::from(self.session.clone())
    }
}

/// Release request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReleaseRequest {
    /// Token returned when the seat was held.
    #[validate(length(min = 1, message = "Hold token is required"))]
    pub hold_token: String,
}

/// Contact attachment request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AttachContactRequest {
    /// Holds to attach the contact to.
    #[validate(length(min = 1, max = 64, message = "Between 1 and 64 holds may be given"))]
    pub holds: Vec<HeldSeat>,
    /// Contact name.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Contact phone.
    #[validate(length(min = 6, max = 32))]
    pub phone: String,
}

impl AttachContactRequest {
    /// Holds as a deduplicated set.
    pub fn hold_set(&self) -> SessionHoldSet {
        SessionHoldSet::from(self.holds.clone())
    }
}

/// Claim request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClaimRequest {
    /// Claim code from the contact receipt.
    #[validate(length(min = 1, max = 32))]
    pub claim_code: String,
    /// Phone recorded on the holds, when the caller wants it checked.
    #[validate(length(min = 6, max = 32))]
    pub phone: Option<String>,
}

/// Admin booking request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    /// Held seats to finalize.
    #[validate(length(min = 1, max = 100))]
    pub seat_ids: Vec<SeatId>,
}
