//! Built-in jobs.

pub mod expiry;

pub use expiry::ExpirySweepJob;
