//! Returning elapsed holds to availability.

pub mod service;

pub use service::{ExpiryService, SweepReport};
