//! Booking finalizer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::result::AppResult;
use seatbook_core::traits::AdminAuthority;
use seatbook_core::types::{AdminIdentity, SeatId};
use seatbook_database::store::{CasOutcome, SeatFilter};
use seatbook_entity::seat::{BookingCode, Seat, SeatCommand};

use crate::context::ServiceContext;
use crate::outcome::{SeatFailure, dedupe};

/// Attempts per seat when a generated booking code collides at write time.
const BOOK_ATTEMPTS: usize = 3;

/// A seat moved to `BOOKED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookedSeat {
    /// Seat concerned.
    pub seat_id: SeatId,
    /// Seat label.
    pub seat_code: String,
    /// Booking reference unique to this seat.
    pub booking_code: BookingCode,
    /// Finalization instant.
    pub booked_at: DateTime<Utc>,
}

/// Result of a finalization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingBatch {
    /// Seats now booked.
    pub booked: Vec<BookedSeat>,
    /// Seats that were not held.
    pub rejected: Vec<SeatFailure>,
}

/// Moves held seats to `BOOKED` on behalf of an admin.
#[derive(Clone)]
pub struct BookingService {
    ctx: ServiceContext,
    authority: Arc<dyn AdminAuthority>,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(ctx: ServiceContext, authority: Arc<dyn AdminAuthority>) -> Self {
        Self { ctx, authority }
    }

    /// Finalize each listed seat that is currently held.
    ///
    /// The request fails outright if the caller is not an admin or a seat
    /// does not exist. Seats that are not held are reported individually
    /// and left untouched.
    pub async fn generate_booking_code(
        &self,
        seat_ids: &[SeatId],
        admin: &AdminIdentity,
    ) -> AppResult<BookingBatch> {
        if !self.authority.is_admin(admin).await? {
            warn!("Booking finalization refused for non-admin caller");
            return Err(AppError::unauthorized("Admin privileges required"));
        }

        let requested = dedupe(seat_ids);
        if requested.is_empty() {
            return Err(AppError::validation("At least one seat must be given"));
        }

        let found = self
            .ctx
            .seats
            .scan(&SeatFilter::new().seats(requested.iter().copied()))
            .await?;
        let seats: Vec<Seat> = requested
            .iter()
            .map(|id| {
                found
                    .iter()
                    .find(|seat| seat.id == *id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found(format!("Seat {id} not found")))
            })
            .collect::<AppResult<_>>()?;

        let mut batch = BookingBatch {
            booked: Vec::new(),
            rejected: Vec::new(),
        };

        for seat in &seats {
            match self.book_one(seat).await {
                Ok(Ok(booked)) => batch.booked.push(booked),
                Ok(Err(failure)) => batch.rejected.push(failure),
                Err(e) if e.kind == ErrorKind::NotFound => {
                    batch.rejected.push(SeatFailure::from_error(seat.id, &seat.code, &e));
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            booked = batch.booked.len(),
            rejected = batch.rejected.len(),
            "Booking finalization processed"
        );
        Ok(batch)
    }

    async fn book_one(&self, seat: &Seat) -> AppResult<Result<BookedSeat, SeatFailure>> {
        let mut last_err = None;

        for _ in 0..BOOK_ATTEMPTS {
            let booking_code = self.ctx.unique_booking_code().await?;
            let booked_at = self.ctx.clock.now();
            let command = SeatCommand::book(booking_code.clone(), booked_at);

            match self.ctx.seats.compare_and_set(seat.id, &command).await {
                Ok(CasOutcome::Applied(updated)) => {
                    info!(
                        seat_id = %updated.id,
                        seat_code = %updated.code,
                        booking_code = %booking_code,
                        "Seat booked"
                    );
                    return Ok(Ok(BookedSeat {
                        seat_id: updated.id,
                        seat_code: updated.code,
                        booking_code,
                        booked_at,
                    }));
                }
                Ok(CasOutcome::Rejected { current, violation }) => {
                    return Ok(Err(SeatFailure::conflict(
                        current.id,
                        &current.code,
                        current.status(),
                        format!("Seat {} cannot be booked ({violation})", current.code),
                    )));
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    warn!(seat_id = %seat.id, "Booking code collided, drawing another");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| AppError::internal("Booking attempts exhausted")))
    }
}
