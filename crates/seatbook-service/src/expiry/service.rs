//! Expiry sweep.
//!
//! Candidates come from a possibly stale scan, so every release is the
//! guarded `expire` transition: a seat that was released, re-held, or
//! booked since the scan fails the guard and is skipped.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use seatbook_core::error::ErrorKind;
use seatbook_core::result::AppResult;
use seatbook_core::types::TripId;
use seatbook_database::store::{CasOutcome, SeatFilter};
use seatbook_entity::seat::{SeatCommand, SeatStatus};

use crate::context::ServiceContext;

/// Summary of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Candidates returned by the scans.
    pub scanned: usize,
    /// Seats returned to availability.
    pub expired: usize,
    /// Candidates whose state changed before the write.
    pub skipped: usize,
    /// Candidates that hit a store error.
    pub failed: usize,
}

/// Releases holds whose expiry has passed.
#[derive(Clone)]
pub struct ExpiryService {
    ctx: ServiceContext,
    batch_size: usize,
}

impl ExpiryService {
    /// Creates a new expiry service scanning at most `batch_size` seats per
    /// store query.
    pub fn new(ctx: ServiceContext, batch_size: usize) -> Self {
        Self {
            ctx,
            batch_size: batch_size.max(1),
        }
    }

    /// Expire every elapsed hold in the store.
    pub async fn sweep(&self) -> AppResult<SweepReport> {
        let started = Instant::now();
        let now = self.ctx.clock.now();
        let report = self.sweep_scope(SeatFilter::new(), now).await?;

        if report.expired > 0 || report.failed > 0 {
            info!(
                scanned = report.scanned,
                expired = report.expired,
                skipped = report.skipped,
                failed = report.failed,
                duration_ms = started.elapsed().as_millis() as u64,
                "Expiry sweep completed"
            );
        } else {
            debug!(scanned = report.scanned, "Expiry sweep found nothing to release");
        }
        Ok(report)
    }

    /// Expire elapsed holds on one trip.
    pub async fn sweep_trip(&self, trip_id: TripId) -> AppResult<SweepReport> {
        let now = self.ctx.clock.now();
        self.sweep_scope(SeatFilter::new().trip(trip_id), now).await
    }

    async fn sweep_scope(&self, scope: SeatFilter, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let filter = scope
            .status(SeatStatus::Hold)
            .expired_at(now)
            .limit(self.batch_size);
        let mut report = SweepReport::default();

        loop {
            let candidates = self.ctx.seats.scan(&filter).await?;
            let page = candidates.len();
            report.scanned += page;

            let mut progressed = false;
            for seat in candidates {
                match self
                    .ctx
                    .seats
                    .compare_and_set(seat.id, &SeatCommand::expire(now))
                    .await
                {
                    Ok(CasOutcome::Applied(_)) => {
                        debug!(seat_id = %seat.id, seat_code = %seat.code, "Hold expired");
                        report.expired += 1;
                        progressed = true;
                    }
                    Ok(CasOutcome::Rejected { violation, .. }) => {
                        debug!(seat_id = %seat.id, %violation, "Seat changed since scan, skipped");
                        report.skipped += 1;
                    }
                    Err(e) if e.kind == ErrorKind::NotFound => {
                        report.skipped += 1;
                    }
                    Err(e) => {
                        warn!(seat_id = %seat.id, error = %e, "Failed to expire hold");
                        report.failed += 1;
                    }
                }
            }

            if page < self.batch_size || !progressed {
                break;
            }
        }

        Ok(report)
    }
}
