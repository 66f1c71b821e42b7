//! Results returned by the hold manager.

use chrono::{DateTime, Utc};
use serde::Serialize;

use seatbook_core::types::{SeatId, TripId};
use seatbook_entity::seat::{ClaimCode, HoldToken};
use seatbook_entity::session::{HeldSeat, SessionHoldSet};

use crate::outcome::SeatFailure;

/// A seat the caller now holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeldSeatReceipt {
    /// Held seat.
    pub seat_id: SeatId,
    /// Seat label.
    pub seat_code: String,
    /// Secret proving ownership. Shown once.
    pub hold_token: HoldToken,
    /// Claim code for recovering the hold.
    pub claim_code: ClaimCode,
    /// When the hold lapses.
    pub expires_at: DateTime<Utc>,
}

/// Result of a hold request: each seat either held or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldBatch {
    /// Trip the seats belong to.
    pub trip_id: TripId,
    /// Seats now held by the caller.
    pub held: Vec<HeldSeatReceipt>,
    /// Seats that could not be held.
    pub rejected: Vec<SeatFailure>,
}

impl HoldBatch {
    /// Session entries for the newly held seats.
    pub fn session_entries(&self) -> impl Iterator<Item = HeldSeat> + '_ {
        self.held.iter().map(|h| HeldSeat {
            seat_id: h.seat_id,
            hold_token: h.hold_token.clone(),
        })
    }

    /// Add the newly held seats to a session.
    pub fn merge_into(&self, session: &mut SessionHoldSet) {
        for entry in self.session_entries() {
            session.insert(entry);
        }
    }
}

/// A seat that received contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedSeat {
    /// Seat concerned.
    pub seat_id: SeatId,
    /// Seat label.
    pub seat_code: String,
    /// Hold expiry, unchanged by the attachment.
    pub expires_at: DateTime<Utc>,
}

/// Result of attaching contact details to a group of holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactReceipt {
    /// Claim code now shared by every attached seat.
    pub claim_code: ClaimCode,
    /// Seats carrying the contact.
    pub seats: Vec<AttachedSeat>,
    /// Seats whose hold changed between validation and write.
    pub rejected: Vec<SeatFailure>,
    /// Latest expiry among the attached seats.
    pub expires_at: DateTime<Utc>,
    /// Who to message to confirm the booking.
    pub admin_contact: Option<String>,
}
