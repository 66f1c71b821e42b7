//! Admin finalization of held seats.

pub mod service;

pub use service::{BookedSeat, BookingBatch, BookingService};
