//! Guarded seat transitions.
//!
//! A [`SeatCommand`] pairs the precondition a store must verify
//! ([`SeatGuard`]) with the state change it writes ([`Transition`]). Stores
//! evaluate both in one indivisible step. Only the legal edges of the seat
//! lifecycle have constructors, so `BOOKED` can never be left.
//!
//! | Command          | Guard                              | Result    |
//! |------------------|------------------------------------|-----------|
//! | `hold`           | `AVAILABLE`                        | `HOLD`    |
//! | `attach_contact` | `HOLD`, token matches, live        | `HOLD`    |
//! | `release`        | `HOLD`, token matches, live        | `AVAILABLE` |
//! | `expire`         | `HOLD`, `expires_at <= now`        | `AVAILABLE` |
//! | `book`           | `HOLD`                             | `BOOKED`  |

use chrono::{DateTime, Utc};
use seatbook_core::AppError;
use seatbook_core::types::SeatId;
use thiserror::Error;

use super::code::{BookingCode, ClaimCode, HoldToken};
use super::contact::Contact;
use super::model::{BookingLock, HoldLock, Seat, SeatState};
use super::status::SeatStatus;

/// Precondition checked against the current seat before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatGuard {
    /// Seat must be available.
    Available,
    /// Seat must be held by `token` with a hold still live at `at`.
    HeldBy {
        /// Token presented by the caller.
        token: HoldToken,
        /// Instant the hold must outlive.
        at: DateTime<Utc>,
    },
    /// Seat must be held, regardless of owner or expiry.
    Held,
    /// Seat must be held with a hold that elapsed at or before the instant.
    ExpiredAt(DateTime<Utc>),
}

/// Why a guard rejected the current seat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    /// The seat is in a different status than required.
    #[error("seat is {actual}, expected {expected}")]
    StatusMismatch {
        /// Status the guard required.
        expected: SeatStatus,
        /// Status the seat was found in.
        actual: SeatStatus,
    },
    /// The presented hold token does not own the hold.
    #[error("hold token does not match")]
    TokenMismatch,
    /// The hold elapsed before the operation.
    #[error("hold has expired")]
    HoldExpired,
    /// The hold is still live, so it cannot be expired.
    #[error("hold is still live")]
    HoldLive,
}

impl GuardViolation {
    /// Map the violation into the application error taxonomy.
    pub fn into_error(self, seat_id: SeatId) -> AppError {
        match self {
            Self::TokenMismatch => {
                AppError::unauthorized(format!("Hold token does not match seat {seat_id}"))
            }
            other => AppError::conflict(format!("Seat {seat_id}: {other}")),
        }
    }
}

impl SeatGuard {
    /// Status the guarded seat must be in.
    pub fn expected_status(&self) -> SeatStatus {
        match self {
            Self::Available => SeatStatus::Available,
            Self::HeldBy { .. } | Self::Held | Self::ExpiredAt(_) => SeatStatus::Hold,
        }
    }

    /// Evaluate the guard against a seat state.
    pub fn check(&self, state: &SeatState) -> Result<(), GuardViolation> {
        let actual = state.status();
        let expected = self.expected_status();
        if actual != expected {
            return Err(GuardViolation::StatusMismatch { expected, actual });
        }

        match (self, state) {
            (Self::HeldBy { token, at }, SeatState::Hold(lock)) => {
                if &lock.hold_token != token {
                    Err(GuardViolation::TokenMismatch)
                } else if lock.expires_at <= *at {
                    Err(GuardViolation::HoldExpired)
                } else {
                    Ok(())
                }
            }
            (Self::ExpiredAt(at), SeatState::Hold(lock)) => {
                if lock.expires_at <= *at {
                    Ok(())
                } else {
                    Err(GuardViolation::HoldLive)
                }
            }
            _ => Ok(()),
        }
    }
}

/// State change written when the guard holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// `AVAILABLE → HOLD` with a fresh lock.
    Hold(HoldLock),
    /// `HOLD → HOLD`, attaching contact details and a shared claim code.
    AttachContact {
        /// Contact details to record.
        contact: Contact,
        /// Claim code replacing the seat's current one.
        claim_code: ClaimCode,
    },
    /// `HOLD → AVAILABLE` by the owner.
    Release,
    /// `HOLD → AVAILABLE` once the hold elapsed.
    Expire,
    /// `HOLD → BOOKED`.
    Book {
        /// Booking reference for this seat.
        booking_code: BookingCode,
        /// Finalization instant.
        booked_at: DateTime<Utc>,
    },
}

/// A guarded transition, the unit of every seat write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatCommand {
    guard: SeatGuard,
    transition: Transition,
    at: DateTime<Utc>,
}

impl SeatCommand {
    /// Place a new hold on an available seat.
    pub fn hold(lock: HoldLock, now: DateTime<Utc>) -> Self {
        Self {
            guard: SeatGuard::Available,
            transition: Transition::Hold(lock),
            at: now,
        }
    }

    /// Attach contact details to a live hold owned by `token`.
    pub fn attach_contact(
        token: HoldToken,
        contact: Contact,
        claim_code: ClaimCode,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            guard: SeatGuard::HeldBy { token, at: now },
            transition: Transition::AttachContact {
                contact,
                claim_code,
            },
            at: now,
        }
    }

    /// Release a live hold owned by `token`.
    pub fn release(token: HoldToken, now: DateTime<Utc>) -> Self {
        Self {
            guard: SeatGuard::HeldBy { token, at: now },
            transition: Transition::Release,
            at: now,
        }
    }

    /// Return a seat whose hold elapsed at or before `now` to availability.
    pub fn expire(now: DateTime<Utc>) -> Self {
        Self {
            guard: SeatGuard::ExpiredAt(now),
            transition: Transition::Expire,
            at: now,
        }
    }

    /// Finalize a held seat.
    pub fn book(booking_code: BookingCode, booked_at: DateTime<Utc>) -> Self {
        Self {
            guard: SeatGuard::Held,
            transition: Transition::Book {
                booking_code,
                booked_at,
            },
            at: booked_at,
        }
    }

    /// Precondition.
    pub fn guard(&self) -> &SeatGuard {
        &self.guard
    }

    /// State change.
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Instant the command was issued at, recorded as `updated_at`.
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Check the guard against `seat` and compute its next version.
    pub fn apply(&self, seat: &Seat) -> Result<Seat, GuardViolation> {
        self.guard.check(&seat.state)?;

        let state = match (&self.transition, &seat.state) {
            (Transition::Hold(lock), _) => SeatState::Hold(lock.clone()),
            (
                Transition::AttachContact {
                    contact,
                    claim_code,
                },
                SeatState::Hold(lock),
            ) => SeatState::Hold(HoldLock {
                claim_code: claim_code.clone(),
                contact: Some(contact.clone()),
                ..lock.clone()
            }),
            (Transition::Release | Transition::Expire, _) => SeatState::Available,
            (
                Transition::Book {
                    booking_code,
                    booked_at,
                },
                SeatState::Hold(lock),
            ) => SeatState::Booked(BookingLock {
                booking_code: booking_code.clone(),
                booked_at: *booked_at,
                contact: lock.contact.clone(),
            }),
            (_, current) => {
                return Err(GuardViolation::StatusMismatch {
                    expected: SeatStatus::Hold,
                    actual: current.status(),
                });
            }
        };

        Ok(Seat {
            state,
            updated_at: self.at,
            ..seat.clone()
        })
    }
}
