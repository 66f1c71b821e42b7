//! Random code generation backed by the operating system RNG.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use seatbook_core::result::AppResult;
use seatbook_entity::seat::{BookingCode, ClaimCode, HoldToken};

/// Uppercase alphabet without look-alikes (`0/O`, `1/I/L`) for codes people type.
const HUMAN_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Bytes of entropy in a hold token.
const HOLD_TOKEN_BYTES: usize = 32;

/// Characters in each half of a claim code.
const CLAIM_GROUP_LEN: usize = 4;

/// Characters after the booking code prefix.
const BOOKING_CODE_LEN: usize = 10;

/// Prefix of every booking code.
pub const BOOKING_CODE_PREFIX: &str = "BK-";

/// Source of fresh hold tokens, claim codes, and booking codes.
pub trait CodeIssuer: Send + Sync + 'static {
    /// A new unguessable hold token.
    fn hold_token(&self) -> HoldToken;

    /// A new short claim code.
    fn claim_code(&self) -> AppResult<ClaimCode>;

    /// A new booking code candidate.
    fn booking_code(&self) -> BookingCode;
}

/// Code issuer drawing from [`OsRng`].
///
/// Hold tokens carry 256 bits of entropy. Claim codes (`XXXX-XXXX`) and
/// booking codes (`BK-XXXXXXXXXX`) are shorter, so callers check them for
/// uniqueness before use.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeIssuer;

impl RandomCodeIssuer {
    /// Create a new issuer.
    pub fn new() -> Self {
        Self
    }
}

impl CodeIssuer for RandomCodeIssuer {
    fn hold_token(&self) -> HoldToken {
        let mut bytes = [0u8; HOLD_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        HoldToken::new(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn claim_code(&self) -> AppResult<ClaimCode> {
        ClaimCode::parse(&format!(
            "{}-{}",
            human_chars(CLAIM_GROUP_LEN),
            human_chars(CLAIM_GROUP_LEN)
        ))
    }

    fn booking_code(&self) -> BookingCode {
        BookingCode::new(format!(
            "{BOOKING_CODE_PREFIX}{}",
            human_chars(BOOKING_CODE_LEN)
        ))
    }
}

fn human_chars(len: usize) -> String {
    (0..len)
        .map(|_| HUMAN_ALPHABET[OsRng.gen_range(0..HUMAN_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hold_tokens_are_long_and_distinct() {
        let issuer = RandomCodeIssuer::new();
        let tokens: HashSet<String> = (0..256)
            .map(|_| issuer.hold_token().as_str().to_string())
            .collect();
        assert_eq!(tokens.len(), 256);
        assert!(tokens.iter().all(|t| t.len() == 43));
    }

    #[test]
    fn test_claim_code_shape() {
        let code = RandomCodeIssuer::new().claim_code().expect("generated code is valid");
        let s = code.as_str();
        assert_eq!(s.len(), 9);
        assert_eq!(&s[4..5], "-");
        assert!(
            s.bytes()
                .filter(|b| *b != b'-')
                .all(|b| HUMAN_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn test_booking_code_shape() {
        let code = RandomCodeIssuer::new().booking_code();
        assert!(code.as_str().starts_with(BOOKING_CODE_PREFIX));
        assert_eq!(code.as_str().len(), BOOKING_CODE_PREFIX.len() + BOOKING_CODE_LEN);
    }
}
