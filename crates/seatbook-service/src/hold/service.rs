//! Hold manager: hold, release, and attach-contact.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use seatbook_core::config::HoldConfig;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::{SeatId, TripId};
use seatbook_database::store::{CasOutcome, SeatFilter};
use seatbook_entity::seat::{Contact, HoldLock, HoldToken, Seat, SeatCommand, SeatGuard};
use seatbook_entity::session::{HeldSeat, SessionHoldSet};

use super::outcome::{AttachedSeat, ContactReceipt, HeldSeatReceipt, HoldBatch};
use crate::context::ServiceContext;
use crate::outcome::{SeatFailure, dedupe};

/// Places and manages seat holds for anonymous sessions.
#[derive(Clone)]
pub struct HoldService {
    ctx: ServiceContext,
    config: HoldConfig,
}

impl HoldService {
    /// Creates a new hold service.
    pub fn new(ctx: ServiceContext, config: HoldConfig) -> Self {
        Self { ctx, config }
    }

    /// Hold seats on a trip for the calling session.
    ///
    /// The whole request fails if any seat is unknown or on another trip, or
    /// if the session's live holds plus the request would exceed the quota.
    /// Otherwise each seat is held independently and seats that are not
    /// available are reported back without failing the others.
    pub async fn hold(
        &self,
        trip_id: TripId,
        seat_ids: &[SeatId],
        session: &SessionHoldSet,
    ) -> AppResult<HoldBatch> {
        let requested = dedupe(seat_ids);
        if requested.is_empty() {
            return Err(AppError::validation("At least one seat must be requested"));
        }
        self.check_session_size(session)?;

        let trip = self
            .ctx
            .trips
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trip {trip_id} not found")))?;
        if !trip.is_active {
            return Err(AppError::conflict(format!(
                "Trip {trip_id} is not accepting holds"
            )));
        }

        let seats = self.load_trip_seats(trip_id, &requested).await?;

        let now = self.ctx.clock.now();
        let active = self.live_holds_at(session, now).await?.len();
        if active + requested.len() > self.config.max_per_session {
            warn!(
                trip_id = %trip_id,
                active,
                requested = requested.len(),
                max = self.config.max_per_session,
                "Hold quota exceeded"
            );
            return Err(AppError::quota_exceeded(format!(
                "A session may hold at most {} seats; {active} already held",
                self.config.max_per_session
            )));
        }

        let mut batch = HoldBatch {
            trip_id,
            held: Vec::new(),
            rejected: Vec::new(),
        };

        for seat in &seats {
            match self.hold_one(seat, now).await? {
                Ok(receipt) => batch.held.push(receipt),
                Err(failure) => batch.rejected.push(failure),
            }
        }

        info!(
            trip_id = %trip_id,
            held = batch.held.len(),
            rejected = batch.rejected.len(),
            "Hold request processed"
        );
        Ok(batch)
    }

    /// Release a live hold the caller owns.
    pub async fn release(&self, seat_id: SeatId, token: &HoldToken) -> AppResult<Seat> {
        let now = self.ctx.clock.now();
        match self
            .ctx
            .seats
            .compare_and_set(seat_id, &SeatCommand::release(token.clone(), now))
            .await?
        {
            CasOutcome::Applied(seat) => {
                info!(seat_id = %seat_id, seat_code = %seat.code, "Hold released");
                Ok(seat)
            }
            CasOutcome::Rejected { violation, .. } => Err(violation.into_error(seat_id)),
        }
    }

    /// Attach contact details to every hold in `holds` and give them one
    /// shared claim code.
    ///
    /// Every token is validated before anything is written; a single bad
    /// token rejects the whole request.
    pub async fn attach_contact(
        &self,
        holds: &SessionHoldSet,
        name: &str,
        phone: &str,
    ) -> AppResult<ContactReceipt> {
        if holds.is_empty() {
            return Err(AppError::validation("At least one hold must be given"));
        }
        self.check_session_size(holds)?;
        let contact = Contact::new(name, phone)?;
        let now = self.ctx.clock.now();

        let found = self
            .ctx
            .seats
            .scan(&SeatFilter::new().seats(holds.iter().map(|h| h.seat_id)))
            .await?;

        let mut validated: Vec<(&HeldSeat, Seat)> = Vec::with_capacity(holds.len());
        for held in holds.iter() {
            let seat = found
                .iter()
                .find(|seat| seat.id == held.seat_id)
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("Seat {} not found", held.seat_id)))?;

            SeatGuard::HeldBy {
                token: held.hold_token.clone(),
                at: now,
            }
            .check(&seat.state)
            .map_err(|v| v.into_error(seat.id))?;

            validated.push((held, seat));
        }

        let claim_code = self.ctx.unique_claim_code().await?;

        let mut seats = Vec::with_capacity(validated.len());
        let mut rejected = Vec::new();
        for (held, seat) in &validated {
            let command = SeatCommand::attach_contact(
                held.hold_token.clone(),
                contact.clone(),
                claim_code.clone(),
                now,
            );
            match self.ctx.seats.compare_and_set(seat.id, &command).await? {
                CasOutcome::Applied(updated) => {
                    let expires_at = updated
                        .hold_lock()
                        .map(|lock| lock.expires_at)
                        .unwrap_or(now);
                    seats.push(AttachedSeat {
                        seat_id: updated.id,
                        seat_code: updated.code,
                        expires_at,
                    });
                }
                CasOutcome::Rejected { current, violation } => {
                    debug!(seat_id = %seat.id, %violation, "Hold changed before contact was attached");
                    rejected.push(SeatFailure::conflict(
                        current.id,
                        &current.code,
                        current.status(),
                        violation.to_string(),
                    ));
                }
            }
        }

        let Some(expires_at) = seats.iter().map(|s| s.expires_at).max() else {
            return Err(AppError::conflict(
                "None of the holds were live when the contact was attached",
            ));
        };

        let admin_contact = match validated.first() {
            Some((_, seat)) => self
                .ctx
                .trips
                .get_trip(seat.trip_id)
                .await?
                .and_then(|trip| trip.admin_contact),
            None => None,
        };

        info!(
            seats = seats.len(),
            rejected = rejected.len(),
            "Contact attached to holds"
        );
        Ok(ContactReceipt {
            claim_code,
            seats,
            rejected,
            expires_at,
            admin_contact,
        })
    }

    fn check_session_size(&self, session: &SessionHoldSet) -> AppResult<()> {
        let max = self.config.max_session_entries();
        if session.len() > max {
            return Err(AppError::validation(format!(
                "A session may present at most {max} holds; {} given",
                session.len()
            )));
        }
        Ok(())
    }

    /// Seats of `session` whose token still owns a live hold at `now`.
    async fn live_holds_at(
        &self,
        session: &SessionHoldSet,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Seat>> {
        if session.is_empty() {
            return Ok(Vec::new());
        }
        let seats = self
            .ctx
            .seats
            .scan(&SeatFilter::new().seats(session.iter().map(|h| h.seat_id)))
            .await?;

        Ok(seats
            .into_iter()
            .filter(|seat| {
                session
                    .iter()
                    .any(|held| held.seat_id == seat.id && seat.is_held_by(&held.hold_token, now))
            })
            .collect())
    }

    /// Load requested seats in request order, rejecting unknown seats and
    /// seats of other trips.
    async fn load_trip_seats(&self, trip_id: TripId, seat_ids: &[SeatId]) -> AppResult<Vec<Seat>> {
        let found = self
            .ctx
            .seats
            .scan(&SeatFilter::new().seats(seat_ids.iter().copied()))
            .await?;

        seat_ids
            .iter()
            .map(|id| {
                found
                    .iter()
                    .find(|seat| seat.id == *id && seat.trip_id == trip_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::not_found(format!("Seat {id} not found on trip {trip_id}"))
                    })
            })
            .collect()
    }

    /// Try to hold one seat. An elapsed hold is expired first so the seat
    /// can be taken immediately.
    async fn hold_one(
        &self,
        seat: &Seat,
        now: DateTime<Utc>,
    ) -> AppResult<Result<HeldSeatReceipt, SeatFailure>> {
        if seat.is_hold_expired(now) {
            if let CasOutcome::Applied(_) = self
                .ctx
                .seats
                .compare_and_set(seat.id, &SeatCommand::expire(now))
                .await?
            {
                debug!(seat_id = %seat.id, "Expired hold released before re-hold");
            }
        }

        let lock = HoldLock {
            hold_token: self.ctx.codes.hold_token(),
            claim_code: self.ctx.unique_claim_code().await?,
            expires_at: now + self.config.ttl(),
            contact: None,
        };

        match self
            .ctx
            .seats
            .compare_and_set(seat.id, &SeatCommand::hold(lock.clone(), now))
            .await?
        {
            CasOutcome::Applied(held) => {
                debug!(seat_id = %held.id, seat_code = %held.code, "Seat held");
                Ok(Ok(HeldSeatReceipt {
                    seat_id: held.id,
                    seat_code: held.code,
                    hold_token: lock.hold_token,
                    claim_code: lock.claim_code,
                    expires_at: lock.expires_at,
                }))
            }
            CasOutcome::Rejected { current, violation } => Ok(Err(SeatFailure::conflict(
                current.id,
                &current.code,
                current.status(),
                format!("Seat {} is not available ({violation})", current.code),
            ))),
        }
    }
}
