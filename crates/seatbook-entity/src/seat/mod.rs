//! Seat entity, its lifecycle states, and the guarded transitions between them.

pub mod code;
pub mod command;
pub mod contact;
pub mod model;
pub mod status;

pub use code::{BookingCode, ClaimCode, HoldToken};
pub use command::{GuardViolation, SeatCommand, SeatGuard, Transition};
pub use contact::Contact;
pub use model::{BookingLock, HoldLock, NewSeat, Seat, SeatRow, SeatState};
pub use status::SeatStatus;
