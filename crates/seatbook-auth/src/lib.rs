//! # seatbook-auth
//!
//! Secrets and authority checks for Seatbook.
//!
//! ## Modules
//!
//! - `codes`: generation of hold tokens, claim codes, and booking codes
//! - `admin`: admin credential hashing and the configured admin predicate

pub mod admin;
pub mod codes;

pub use admin::{ConfiguredAdminAuthority, hash_admin_key};
pub use codes::{CodeIssuer, RandomCodeIssuer};
