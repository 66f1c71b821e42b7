//! PostgreSQL seat store.
//!
//! A compare-and-set is one `UPDATE seats SET <transition> WHERE id = $1 AND
//! <guard> RETURNING *` statement, so row-level locking makes the guard
//! check and the write indivisible.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::result::AppResult;
use seatbook_core::types::SeatId;
use seatbook_entity::seat::{
    GuardViolation, NewSeat, Seat, SeatCommand, SeatGuard, SeatRow, SeatStatus, Transition,
};

use super::query_error;
use crate::connection::ping;
use crate::store::{CasOutcome, SeatFilter, SeatStore};

const SEAT_COLUMNS: &str = "id, trip_id, code, status, hold_token, claim_code, hold_expires_at, \
     booking_code, booked_at, contact_name, contact_phone, updated_at";

/// Attempts made when a rejected update turns out to pass its guard on
/// re-read because the row changed in between.
const MAX_CAS_ATTEMPTS: usize = 3;

/// Repository for seat reads and guarded writes.
#[derive(Debug, Clone)]
pub struct SeatRepository {
    pool: PgPool,
}

impl SeatRepository {
    /// Create a new seat repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn try_update(&self, seat_id: SeatId, command: &SeatCommand) -> AppResult<Option<Seat>> {
        let mut qb = build_update(seat_id, command);
        let row = qb
            .build_query_as::<SeatRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, seat_id))?;
        row.map(Seat::try_from).transpose()
    }
}

#[async_trait]
impl SeatStore for SeatRepository {
    async fn get(&self, seat_id: SeatId) -> AppResult<Option<Seat>> {
        let row = sqlx::query_as::<_, SeatRow>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE id = $1"
        ))
        .bind(seat_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error(e, "Failed to find seat"))?;

        row.map(Seat::try_from).transpose()
    }

    async fn compare_and_set(
        &self,
        seat_id: SeatId,
        command: &SeatCommand,
    ) -> AppResult<CasOutcome> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            if let Some(seat) = self.try_update(seat_id, command).await? {
                return Ok(CasOutcome::Applied(seat));
            }

            let current = self
                .get(seat_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Seat {seat_id} not found")))?;

            match command.guard().check(&current.state) {
                Err(violation) => {
                    debug!(seat_id = %seat_id, %violation, "Compare-and-set rejected");
                    return Ok(CasOutcome::Rejected { current, violation });
                }
                Ok(()) => {
                    debug!(seat_id = %seat_id, attempt, "Seat changed under update, retrying");
                }
            }
        }

        let current = self
            .get(seat_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Seat {seat_id} not found")))?;
        let violation = command
            .guard()
            .check(&current.state)
            .err()
            .unwrap_or(GuardViolation::StatusMismatch {
                expected: command.guard().expected_status(),
                actual: current.status(),
            });
        Ok(CasOutcome::Rejected { current, violation })
    }

    async fn scan(&self, filter: &SeatFilter) -> AppResult<Vec<Seat>> {
        let mut qb = build_scan(filter);
        let rows = qb
            .build_query_as::<SeatRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error(e, "Failed to scan seats"))?;

        rows.into_iter().map(Seat::try_from).collect()
    }

    async fn insert_seats(&self, seats: &[NewSeat]) -> AppResult<u64> {
        if seats.is_empty() {
            return Ok(0);
        }

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("INSERT INTO seats (id, trip_id, code) ");
        qb.push_values(seats, |mut row, seat| {
            row.push_bind(SeatId::new())
                .push_bind(seat.trip_id)
                .push_bind(seat.code.clone());
        });
        qb.push(" ON CONFLICT (trip_id, code) DO NOTHING");

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| query_error(e, "Failed to insert seats"))?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        ping(&self.pool).await
    }
}

/// Build the guarded `UPDATE … RETURNING` for a command.
fn build_update(seat_id: SeatId, command: &SeatCommand) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE seats SET ");

    match command.transition() {
        Transition::Hold(lock) => {
            qb.push("status = ")
                .push_bind(SeatStatus::Hold)
                .push(", hold_token = ")
                .push_bind(lock.hold_token.as_str().to_owned())
                .push(", claim_code = ")
                .push_bind(lock.claim_code.as_str().to_owned())
                .push(", hold_expires_at = ")
                .push_bind(lock.expires_at)
                .push(", contact_name = NULL, contact_phone = NULL");
        }
        Transition::AttachContact {
            contact,
            claim_code,
        } => {
            qb.push("claim_code = ")
                .push_bind(claim_code.as_str().to_owned())
                .push(", contact_name = ")
                .push_bind(contact.name.clone())
                .push(", contact_phone = ")
                .push_bind(contact.phone.clone());
        }
        Transition::Release | Transition::Expire => {
            qb.push("status = ")
                .push_bind(SeatStatus::Available)
                .push(
                    ", hold_token = NULL, claim_code = NULL, hold_expires_at = NULL, \
                     contact_name = NULL, contact_phone = NULL",
                );
        }
        Transition::Book {
            booking_code,
            booked_at,
        } => {
            qb.push("status = ")
                .push_bind(SeatStatus::Booked)
                .push(", booking_code = ")
                .push_bind(booking_code.as_str().to_owned())
                .push(", booked_at = ")
                .push_bind(*booked_at)
                .push(", hold_token = NULL, claim_code = NULL, hold_expires_at = NULL");
        }
    }

    qb.push(", updated_at = ")
        .push_bind(command.at())
        .push(" WHERE id = ")
        .push_bind(seat_id);

    push_guard(&mut qb, command.guard());

    qb.push(" RETURNING ").push(SEAT_COLUMNS);
    qb
}

fn push_guard(qb: &mut QueryBuilder<'static, Postgres>, guard: &SeatGuard) {
    qb.push(" AND status = ").push_bind(guard.expected_status());

    match guard {
        SeatGuard::Available | SeatGuard::Held => {}
        SeatGuard::HeldBy { token, at } => {
            qb.push(" AND hold_token = ")
                .push_bind(token.as_str().to_owned())
                .push(" AND hold_expires_at > ")
                .push_bind(*at);
        }
        SeatGuard::ExpiredAt(at) => {
            qb.push(" AND hold_expires_at <= ").push_bind(*at);
        }
    }
}

/// Build the `SELECT` for a scan filter.
fn build_scan(filter: &SeatFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {SEAT_COLUMNS} FROM seats WHERE TRUE"));

    if let Some(trip_id) = filter.trip_id {
        qb.push(" AND trip_id = ").push_bind(trip_id);
    }
    if let Some(ids) = &filter.seat_ids {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        qb.push(" AND id = ANY(").push_bind(ids).push(")");
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(code) = &filter.claim_code {
        qb.push(" AND status = 'hold' AND claim_code = ")
            .push_bind(code.as_str().to_owned());
    }
    if let Some(code) = &filter.booking_code {
        qb.push(" AND status = 'booked' AND booking_code = ")
            .push_bind(code.as_str().to_owned());
    }
    if let Some(now) = filter.expired_at {
        qb.push(" AND status = 'hold' AND hold_expires_at <= ")
            .push_bind(now);
    }

    qb.push(" ORDER BY trip_id, code");
    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit as i64);
    }
    qb
}

fn map_write_error(err: sqlx::Error, seat_id: SeatId) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        AppError::with_source(
            ErrorKind::Conflict,
            format!("Seat {seat_id}: generated code already in use"),
            err,
        )
    } else {
        query_error(err, "Failed to update seat")
    }
}
