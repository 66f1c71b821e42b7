//! Opaque codes issued over a seat's lifecycle.
//!
//! - [`HoldToken`]: bearer secret proving ownership of a hold.
//! - [`ClaimCode`]: short, human-typable code shared by a group of holds.
//! - [`BookingCode`]: admin-issued reference for a finalized booking.

use std::fmt;

use seatbook_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Longest claim code accepted on input.
const MAX_CLAIM_CODE_LEN: usize = 32;

/// Unguessable bearer token binding a seat to the session that holds it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoldToken(String);

impl HoldToken {
    /// Wrap an already generated token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HoldToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "HoldToken({visible}…)")
    }
}

/// Claim code shared by every seat a contact was attached to.
///
/// Codes are case-insensitive for users; they are stored upper-cased with
/// surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClaimCode(String);

impl ClaimCode {
    /// Normalize and validate user input.
    pub fn parse(input: &str) -> AppResult<Self> {
        let normalized = input.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(AppError::validation("Claim code must not be empty"));
        }
        if normalized.len() > MAX_CLAIM_CODE_LEN {
            return Err(AppError::validation("Claim code is too long"));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(AppError::validation(
                "Claim code may only contain letters, digits, and '-'",
            ));
        }
        Ok(Self(normalized))
    }

    /// Borrow the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClaimCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClaimCode> for String {
    fn from(code: ClaimCode) -> Self {
        code.0
    }
}

impl fmt::Display for ClaimCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference code assigned to a seat when an admin finalizes its booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingCode(String);

impl BookingCode {
    /// Wrap an already generated booking code.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
