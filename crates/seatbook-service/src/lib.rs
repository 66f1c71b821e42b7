//! # seatbook-service
//!
//! Business logic for Seatbook. Every seat write is a guarded
//! compare-and-set on the seat store, so services never lock more than one
//! seat and never leave a seat in an intermediate state.
//!
//! ## Modules
//!
//! - `hold`: placing, releasing, and attaching contacts to holds
//! - `claim`: recovering holds from a claim code
//! - `booking`: admin finalization of held seats
//! - `expiry`: returning elapsed holds to availability
//! - `trip`: seat map queries and seat layout provisioning

pub mod booking;
pub mod claim;
pub mod context;
pub mod expiry;
pub mod hold;
pub mod outcome;
pub mod trip;

#[cfg(test)]
pub(crate) mod testing;

pub use booking::BookingService;
pub use claim::ClaimService;
pub use context::ServiceContext;
pub use expiry::ExpiryService;
pub use hold::HoldService;
pub use trip::{ProvisionService, SeatMapService};
