//! Contracts defined in `seatbook-core` and implemented by other crates.

pub mod admin;
pub mod clock;

pub use admin::AdminAuthority;
pub use clock::{Clock, ManualClock, SystemClock};
