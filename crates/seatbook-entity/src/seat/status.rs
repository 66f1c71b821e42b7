//! Seat status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse lifecycle status of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "seat_status", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum SeatStatus {
    /// Free to be held.
    Available,
    /// Temporarily locked by a hold token until its expiry.
    Hold,
    /// Permanently reserved. Terminal.
    Booked,
}

impl SeatStatus {
    /// Return the status as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Hold => "HOLD",
            Self::Booked => "BOOKED",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
