//! Traveller contact details attached to held seats.

use seatbook_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Name and phone number of the traveller behind a hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Traveller's display name.
    pub name: String,
    /// Traveller's phone number as entered.
    pub phone: String,
}

impl Contact {
    /// Build a contact from raw input, trimming both fields.
    pub fn new(name: &str, phone: &str) -> AppResult<Self> {
        let name = name.trim();
        let phone = phone.trim();

        if name.is_empty() {
            return Err(AppError::validation("Name must not be empty"));
        }
        if name.chars().count() > 120 {
            return Err(AppError::validation("Name must be at most 120 characters"));
        }

        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if !(6..=20).contains(&digits) {
            return Err(AppError::validation("Phone must contain 6 to 20 digits"));
        }
        if !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
        {
            return Err(AppError::validation("Phone contains invalid characters"));
        }

        Ok(Self {
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }

    /// Compare phone numbers ignoring formatting characters.
    pub fn phone_matches(&self, candidate: &str) -> bool {
        digits_of(&self.phone) == digits_of(candidate)
    }
}

fn digits_of(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}
