//! Caller identity presented for admin-only operations.

use std::fmt;

/// Opaque credential a caller presents when invoking an admin operation.
///
/// The value is never logged; `Debug` and `Display` print a redacted form.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminIdentity(String);

impl AdminIdentity {
    /// Wrap a raw credential.
    pub fn new(credential: impl Into<String>) -> Self {
        Self(credential.into())
    }

    /// Borrow the raw credential for verification.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminIdentity(***)")
    }
}

impl fmt::Display for AdminIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
