//! Claim resolver.
//!
//! Claiming is read-only: it reissues the tokens already bound to the held
//! seats and never extends their expiry.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::{SeatId, TripId};
use seatbook_database::store::SeatFilter;
use seatbook_entity::seat::{ClaimCode, HoldToken, SeatStatus};
use seatbook_entity::session::{HeldSeat, SessionHoldSet};

use crate::context::ServiceContext;

/// A held seat recovered through its claim code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimedSeat {
    /// Seat concerned.
    pub seat_id: SeatId,
    /// Seat label.
    pub seat_code: String,
    /// The seat's existing hold token.
    pub hold_token: HoldToken,
    /// Unchanged hold expiry.
    pub expires_at: DateTime<Utc>,
}

/// Holds recovered through a claim code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimedHold {
    /// Normalized claim code.
    pub claim_code: ClaimCode,
    /// Trip the seats belong to.
    pub trip_id: TripId,
    /// Contact name recorded on the holds.
    pub contact_name: Option<String>,
    /// Live held seats.
    pub seats: Vec<ClaimedSeat>,
}

impl ClaimedHold {
    /// Session state a client can resume with.
    pub fn session(&self) -> SessionHoldSet {
        self.seats
            .iter()
            .map(|s| HeldSeat {
                seat_id: s.seat_id,
                hold_token: s.hold_token.clone(),
            })
            .collect()
    }
}

/// Resolves claim codes to the holds carrying them.
#[derive(Clone)]
pub struct ClaimService {
    ctx: ServiceContext,
}

impl ClaimService {
    /// Creates a new claim service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Return every live hold carrying `code`.
    ///
    /// When `phone` is given, only holds whose recorded contact phone
    /// matches are returned.
    pub async fn claim(&self, code: &ClaimCode, phone: Option<&str>) -> AppResult<ClaimedHold> {
        let now = self.ctx.clock.now();
        let seats = self
            .ctx
            .seats
            .scan(
                &SeatFilter::new()
                    .status(SeatStatus::Hold)
                    .claim_code(code.clone()),
            )
            .await?;

        let matching: Vec<_> = seats
            .into_iter()
            .filter(|seat| seat.is_hold_live(now))
            .filter(|seat| match phone {
                Some(phone) => seat
                    .hold_lock()
                    .and_then(|lock| lock.contact.as_ref())
                    .is_some_and(|contact| contact.phone_matches(phone)),
                None => true,
            })
            .collect();

        let Some(first) = matching.first() else {
            debug!(claim_code = %code, "Claim code matched no live hold");
            return Err(AppError::not_found("No live hold matches this claim code"));
        };

        let trip_id = first.trip_id;
        let contact_name = first
            .hold_lock()
            .and_then(|lock| lock.contact.as_ref())
            .map(|contact| contact.name.clone());

        let seats: Vec<ClaimedSeat> = matching
            .iter()
            .filter_map(|seat| {
                seat.hold_lock().map(|lock| ClaimedSeat {
                    seat_id: seat.id,
                    seat_code: seat.code.clone(),
                    hold_token: lock.hold_token.clone(),
                    expires_at: lock.expires_at,
                })
            })
            .collect();

        info!(claim_code = %code, seats = seats.len(), "Holds claimed");
        Ok(ClaimedHold {
            claim_code: code.clone(),
            trip_id,
            contact_name,
            seats,
        })
    }
}
