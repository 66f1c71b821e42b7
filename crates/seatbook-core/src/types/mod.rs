//! Core type definitions used across the Seatbook workspace.

pub mod admin;
pub mod id;

pub use admin::AdminIdentity;
pub use id::*;
