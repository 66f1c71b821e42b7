//! Client-held session state.

pub mod hold_set;

pub use hold_set::{HeldSeat, SessionHoldSet};
