//! Periodic background jobs for Seatbook.
//!
//! This crate provides:
//! - The [`PeriodicJob`] contract and its error type
//! - A runner that ticks a job on a fixed interval until cancelled
//! - The expiry sweep job

pub mod executor;
pub mod jobs;
pub mod runner;

pub use executor::{JobExecutionError, PeriodicJob};
pub use jobs::ExpirySweepJob;
pub use runner::JobRunner;
