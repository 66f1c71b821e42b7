//! Issuance of the opaque codes used across a seat's lifecycle.

pub mod generator;

pub use generator::{CodeIssuer, RandomCodeIssuer};
