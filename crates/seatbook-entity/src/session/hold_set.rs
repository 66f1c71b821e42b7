//! The set of holds a client session believes it owns.
//!
//! Sessions are not stored server-side. A client presents the
//! `(seat_id, hold_token)` pairs it received from earlier hold calls, and
//! the server verifies each pair against the seat store before counting it
//! toward the per-session quota.

use seatbook_core::types::SeatId;
use serde::{Deserialize, Serialize};

use crate::seat::HoldToken;

/// One hold a session claims to own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldSeat {
    /// Held seat.
    pub seat_id: SeatId,
    /// Token returned when the seat was held.
    pub hold_token: HoldToken,
}

/// Holds presented by a session, at most one entry per seat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HeldSeat>", into = "Vec<HeldSeat>")]
pub struct SessionHoldSet {
    holds: Vec<HeldSeat>,
}

impl SessionHoldSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hold, replacing any earlier entry for the same seat.
    pub fn insert(&mut self, held: HeldSeat) {
        match self.holds.iter_mut().find(|h| h.seat_id == held.seat_id) {
            Some(existing) => existing.hold_token = held.hold_token,
            None => self.holds.push(held),
        }
    }

    /// Remove the entry for a seat, returning it if present.
    pub fn remove(&mut self, seat_id: SeatId) -> Option<HeldSeat> {
        let index = self.holds.iter().position(|h| h.seat_id == seat_id)?;
        Some(self.holds.remove(index))
    }

    /// Whether the set has an entry for the seat.
    pub fn contains(&self, seat_id: SeatId) -> bool {
        self.holds.iter().any(|h| h.seat_id == seat_id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.holds.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &HeldSeat> {
        self.holds.iter()
    }
}

impl From<Vec<HeldSeat>> for SessionHoldSet {
    fn from(holds: Vec<HeldSeat>) -> Self {
        let mut set = Self::new();
        for held in holds {
            set.insert(held);
        }
        set
    }
}

impl From<SessionHoldSet> for Vec<HeldSeat> {
    fn from(set: SessionHoldSet) -> Self {
        set.holds
    }
}

impl FromIterator<HeldSeat> for SessionHoldSet {
    fn from_iter<I: IntoIterator<Item = HeldSeat>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}
