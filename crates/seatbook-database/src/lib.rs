//! # seatbook-database
//!
//! Seat store contracts and their implementations: a process-local store
//! for single-node deployments and tests, and a PostgreSQL store whose
//! compare-and-set is a single conditional `UPDATE`.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{CasOutcome, MemoryStore, SeatFilter, SeatStore, SeatStoreDispatch, TripCatalog};
