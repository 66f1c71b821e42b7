//! Recovering holds from a claim code.

pub mod service;

pub use service::{ClaimService, ClaimedHold, ClaimedSeat};
