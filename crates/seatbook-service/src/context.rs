//! Collaborators shared by every service.

use std::sync::Arc;

use seatbook_auth::codes::CodeIssuer;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::traits::Clock;
use seatbook_database::store::{SeatFilter, SeatStore, TripCatalog};
use seatbook_entity::seat::{BookingCode, ClaimCode};

/// Attempts at drawing a code that no other seat carries.
const UNIQUE_CODE_ATTEMPTS: usize = 5;

/// Seat store, trip catalog, clock, and code issuer used by the services.
#[derive(Clone)]
pub struct ServiceContext {
    /// Seat store.
    pub seats: Arc<dyn SeatStore>,
    /// Trip lookups.
    pub trips: Arc<dyn TripCatalog>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Code generation.
    pub codes: Arc<dyn CodeIssuer>,
}

impl ServiceContext {
    /// Bundle collaborators.
    pub fn new(
        seats: Arc<dyn SeatStore>,
        trips: Arc<dyn TripCatalog>,
        clock: Arc<dyn Clock>,
        codes: Arc<dyn CodeIssuer>,
    ) -> Self {
        Self {
            seats,
            trips,
            clock,
            codes,
        }
    }

    /// Draw a claim code not carried by any held seat.
    pub async fn unique_claim_code(&self) -> AppResult<ClaimCode> {
        for _ in 0..UNIQUE_CODE_ATTEMPTS {
            let code = self.codes.claim_code()?;
            let taken = self
                .seats
                .scan(&SeatFilter::new().claim_code(code.clone()).limit(1))
                .await?;
            if taken.is_empty() {
                return Ok(code);
            }
        }
        Err(AppError::internal("Could not generate a unique claim code"))
    }

    /// Draw a booking code not carried by any booked seat.
    pub async fn unique_booking_code(&self) -> AppResult<BookingCode> {
        for _ in 0..UNIQUE_CODE_ATTEMPTS {
            let code = self.codes.booking_code();
            let taken = self
                .seats
                .scan(&SeatFilter::new().booking_code(code.clone()).limit(1))
                .await?;
            if taken.is_empty() {
                return Ok(code);
            }
        }
        Err(AppError::internal("Could not generate a unique booking code"))
    }
}
