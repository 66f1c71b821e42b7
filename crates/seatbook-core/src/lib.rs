//! # seatbook-core
//!
//! Core crate for Seatbook. Contains the clock and admin-authority
//! contracts, configuration schemas, typed identifiers, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Seatbook crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
