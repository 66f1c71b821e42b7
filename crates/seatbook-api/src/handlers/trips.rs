//! Seat map handler.

use axum::Json;
use axum::extract::{Path, State};

use seatbook_core::types::TripId;
use seatbook_service::trip::SeatMap;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/trips/{trip_id}/seats
pub async fn seat_map(
    State(state): State<AppState>,
    Path(trip_id): Path<TripId>,
) -> Result<Json<ApiResponse<SeatMap>>, ApiError> {
    let map = state.seat_map_service.seat_map(trip_id).await?;
    Ok(Json(ApiResponse::ok(map)))
}
