//! Seat entity model.

use chrono::{DateTime, Utc};
use seatbook_core::AppError;
use seatbook_core::types::{SeatId, TripId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::code::{BookingCode, ClaimCode, HoldToken};
use super::contact::Contact;
use super::status::SeatStatus;

/// Lock data carried by a held seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldLock {
    /// Bearer token of the owning session.
    pub hold_token: HoldToken,
    /// Claim code that can recover this hold.
    pub claim_code: ClaimCode,
    /// Instant after which the hold is no longer live.
    pub expires_at: DateTime<Utc>,
    /// Contact details, once attached.
    pub contact: Option<Contact>,
}

/// Booking data carried by a booked seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingLock {
    /// Admin-issued booking reference.
    pub booking_code: BookingCode,
    /// When the booking was finalized.
    pub booked_at: DateTime<Utc>,
    /// Contact details carried over from the hold.
    pub contact: Option<Contact>,
}

/// Lifecycle state of a seat together with the data each state owns.
///
/// Lock fields only exist while the seat is held and the booking code only
/// once it is booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum SeatState {
    /// Free to be held.
    Available,
    /// Held by a session until `expires_at`.
    Hold(HoldLock),
    /// Booked. Terminal.
    Booked(BookingLock),
}

impl SeatState {
    /// Coarse status of this state.
    pub fn status(&self) -> SeatStatus {
        match self {
            Self::Available => SeatStatus::Available,
            Self::Hold(_) => SeatStatus::Hold,
            Self::Booked(_) => SeatStatus::Booked,
        }
    }
}

/// A physical seat on a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Unique seat identifier.
    pub id: SeatId,
    /// The trip this seat belongs to.
    pub trip_id: TripId,
    /// Seat label printed on the bus, e.g. `A1`.
    pub code: String,
    /// Current lifecycle state.
    pub state: SeatState,
    /// When the seat last changed state.
    pub updated_at: DateTime<Utc>,
}

impl Seat {
    /// Create a fresh available seat.
    pub fn available(trip_id: TripId, code: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: SeatId::new(),
            trip_id,
            code: code.into(),
            state: SeatState::Available,
            updated_at: now,
        }
    }

    /// Coarse status.
    pub fn status(&self) -> SeatStatus {
        self.state.status()
    }

    /// Hold lock, if the seat is held.
    pub fn hold_lock(&self) -> Option<&HoldLock> {
        match &self.state {
            SeatState::Hold(lock) => Some(lock),
            _ => None,
        }
    }

    /// Booking data, if the seat is booked.
    pub fn booking(&self) -> Option<&BookingLock> {
        match &self.state {
            SeatState::Booked(booking) => Some(booking),
            _ => None,
        }
    }

    /// Whether the seat is held and the hold has not yet elapsed at `now`.
    pub fn is_hold_live(&self, now: DateTime<Utc>) -> bool {
        self.hold_lock().is_some_and(|lock| lock.expires_at > now)
    }

    /// Whether the seat is held but the hold elapsed at or before `now`.
    pub fn is_hold_expired(&self, now: DateTime<Utc>) -> bool {
        self.hold_lock().is_some_and(|lock| lock.expires_at <= now)
    }

    /// Whether `token` owns a hold on this seat that is still live at `now`.
    pub fn is_held_by(&self, token: &HoldToken, now: DateTime<Utc>) -> bool {
        self.hold_lock()
            .is_some_and(|lock| &lock.hold_token == token && lock.expires_at > now)
    }
}

/// Seat to be inserted by layout provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSeat {
    /// Trip the seat belongs to.
    pub trip_id: TripId,
    /// Seat label.
    pub code: String,
}

/// Flat database representation of a seat.
#[derive(Debug, Clone, FromRow)]
pub struct SeatRow {
    /// Seat identifier.
    pub id: SeatId,
    /// Owning trip.
    pub trip_id: TripId,
    /// Seat label.
    pub code: String,
    /// Lifecycle status.
    pub status: SeatStatus,
    /// Hold token (HOLD only).
    pub hold_token: Option<String>,
    /// Claim code (HOLD only).
    pub claim_code: Option<String>,
    /// Hold expiry (HOLD only).
    pub hold_expires_at: Option<DateTime<Utc>>,
    /// Booking reference (BOOKED only).
    pub booking_code: Option<String>,
    /// Booking time (BOOKED only).
    pub booked_at: Option<DateTime<Utc>>,
    /// Contact name.
    pub contact_name: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Last state change.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SeatRow> for Seat {
    type Error = AppError;

    fn try_from(row: SeatRow) -> Result<Self, Self::Error> {
        let contact = match (row.contact_name, row.contact_phone) {
            (Some(name), Some(phone)) => Some(Contact { name, phone }),
            (None, None) => None,
            _ => {
                return Err(AppError::internal(format!(
                    "Seat {} has a partial contact",
                    row.id
                )));
            }
        };

        let state = match row.status {
            SeatStatus::Available => {
                if row.hold_token.is_some() || row.booking_code.is_some() || contact.is_some() {
                    return Err(inconsistent(row.id, row.status));
                }
                SeatState::Available
            }
            SeatStatus::Hold => match (row.hold_token, row.claim_code, row.hold_expires_at) {
                (Some(token), Some(claim), Some(expires_at)) if row.booking_code.is_none() => {
                    SeatState::Hold(HoldLock {
                        hold_token: HoldToken::new(token),
                        claim_code: ClaimCode::parse(&claim)?,
                        expires_at,
                        contact,
                    })
                }
                _ => return Err(inconsistent(row.id, row.status)),
            },
            SeatStatus::Booked => match (row.booking_code, row.booked_at) {
                (Some(code), Some(booked_at)) if row.hold_token.is_none() => {
                    SeatState::Booked(BookingLock {
                        booking_code: BookingCode::new(code),
                        booked_at,
                        contact,
                    })
                }
                _ => return Err(inconsistent(row.id, row.status)),
            },
        };

        Ok(Self {
            id: row.id,
            trip_id: row.trip_id,
            code: row.code,
            state,
            updated_at: row.updated_at,
        })
    }
}

fn inconsistent(id: SeatId, status: SeatStatus) -> AppError {
    AppError::internal(format!(
        "Seat {id} row has fields inconsistent with status {status}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(status: SeatStatus) -> SeatRow {
        SeatRow {
            id: SeatId::new(),
            trip_id: TripId::new(),
            code: "A1".to_string(),
            status,
            hold_token: None,
            claim_code: None,
            hold_expires_at: None,
            booking_code: None,
            booked_at: None,
            contact_name: None,
            contact_phone: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_hold_row_converts() {
        let mut r = row(SeatStatus::Hold);
        r.hold_token = Some("tok".to_string());
        r.claim_code = Some("ab12-cd34".to_string());
        r.hold_expires_at = Some(Utc::now() + Duration::minutes(10));
        let seat = Seat::try_from(r).expect("consistent row");
        let lock = seat.hold_lock().expect("held");
        assert_eq!(lock.claim_code.as_str(), "AB12-CD34");
        assert!(lock.contact.is_none());
    }

    #[test]
    fn test_available_row_with_token_is_rejected() {
        let mut r = row(SeatStatus::Available);
        r.hold_token = Some("stale".to_string());
        assert!(Seat::try_from(r).is_err());
    }

    #[test]
    fn test_hold_row_without_expiry_is_rejected() {
        let mut r = row(SeatStatus::Hold);
        r.hold_token = Some("tok".to_string());
        r.claim_code = Some("AB12-CD34".to_string());
        assert!(Seat::try_from(r).is_err());
    }

    #[test]
    fn test_booked_row_keeps_contact() {
        let mut r = row(SeatStatus::Booked);
        r.booking_code = Some("BK-7Q2M9XKD4A".to_string());
        r.booked_at = Some(Utc::now());
        r.contact_name = Some("Sari".to_string());
        r.contact_phone = Some("08123456789".to_string());
        let seat = Seat::try_from(r).expect("consistent row");
        let booking = seat.booking().expect("booked");
        assert_eq!(booking.contact.as_ref().map(|c| c.name.as_str()), Some("Sari"));
    }

    #[test]
    fn test_liveness_boundary() {
        let now = Utc::now();
        let mut seat = Seat::available(TripId::new(), "A1", now);
        seat.state = SeatState::Hold(HoldLock {
            hold_token: HoldToken::new("t"),
            claim_code: ClaimCode::parse("AAAA-BBBB").expect("valid"),
            expires_at: now,
            contact: None,
        });
        assert!(!seat.is_hold_live(now));
        assert!(seat.is_hold_expired(now));
        assert!(seat.is_hold_live(now - Duration::seconds(1)));
    }
}
