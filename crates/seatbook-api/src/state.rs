//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use seatbook_core::config::AppConfig;
use seatbook_core::traits::AdminAuthority;
use seatbook_service::{
    BookingService, ClaimService, ExpiryService, HoldService, SeatMapService, ServiceContext,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Every field is cheap
/// to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Store, clock, and code issuer shared by the services
    pub ctx: ServiceContext,
    /// Placing, releasing, and annotating holds
    pub hold_service: HoldService,
    /// Claim code resolution
    pub claim_service: ClaimService,
    /// Admin booking finalization
    pub booking_service: BookingService,
    /// Public seat maps
    pub seat_map_service: SeatMapService,
    /// Expiry sweeps
    pub expiry_service: ExpiryService,
}

impl AppState {
    /// Build every service over one context.
    pub fn new(
        config: Arc<AppConfig>,
        ctx: ServiceContext,
        authority: Arc<dyn AdminAuthority>,
    ) -> Self {
        let expiry_service = ExpiryService::new(ctx.clone(), config.sweeper.batch_size);

        Self {
            hold_service: HoldService::new(ctx.clone(), config.hold.clone()),
            claim_service: ClaimService::new(ctx.clone()),
            booking_service: BookingService::new(ctx.clone(), authority),
            seat_map_service: SeatMapService::new(ctx.clone(), expiry_service.clone()),
            expiry_service,
            ctx,
            config,
        }
    }
}
