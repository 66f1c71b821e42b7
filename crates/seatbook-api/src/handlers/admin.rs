//! Admin booking handler.

use axum::Json;
use axum::extract::State;

use seatbook_service::booking::BookingBatch;

use crate::dto::request::BookingRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AdminCaller, ValidatedJson};
use crate::state::AppState;

/// POST /api/admin/bookings
pub async fn create_bookings(
    State(state): State<AppState>,
    admin: AdminCaller,
    ValidatedJson(req): ValidatedJson<BookingRequest>,
) -> Result<Json<ApiResponse<BookingBatch>>, ApiError> {
    let batch = state
        .booking_service
        .generate_booking_code(&req.seat_ids, admin.identity())
        .await?;

    Ok(Json(ApiResponse::ok(batch)))
}
