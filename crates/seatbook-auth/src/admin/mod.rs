//! Admin authority backed by configured key digests.

pub mod authority;

pub use authority::{ConfiguredAdminAuthority, hash_admin_key};
