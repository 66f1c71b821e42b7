//! Trip entity.

pub mod model;

pub use model::{NewTrip, Trip};
