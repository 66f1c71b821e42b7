//! Placing, releasing, and annotating holds.

pub mod outcome;
pub mod service;

pub use outcome::{AttachedSeat, ContactReceipt, HeldSeatReceipt, HoldBatch};
pub use service::HoldService;
