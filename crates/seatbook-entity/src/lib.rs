//! # seatbook-entity
//!
//! Domain entity models for Seatbook: trips, seats, the seat state machine,
//! and the opaque codes handed to travellers and admins.

pub mod seat;
pub mod session;
pub mod trip;
