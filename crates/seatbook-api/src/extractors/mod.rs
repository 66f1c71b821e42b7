//! Custom Axum extractors.

pub mod admin;
pub mod validated;

pub use admin::AdminCaller;
pub use validated::ValidatedJson;
