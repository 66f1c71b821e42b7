//! Traveller-facing hold handlers.

use axum::Json;
use axum::extract::{Path, State};

use seatbook_core::types::{SeatId, TripId};
use seatbook_entity::seat::{ClaimCode, HoldToken};
use seatbook_service::hold::ContactReceipt;

use crate::dto::request::{AttachContactRequest, ClaimRequest, HoldSeatsRequest, ReleaseRequest};
use crate::dto::response::{ApiResponse, ClaimResponse, HoldResponse, ReleaseResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/trips/{trip_id}/holds
pub async fn hold_seats(
    State(state): State<AppState>,
    Path(trip_id): Path<TripId>,
    ValidatedJson(req): ValidatedJson<HoldSeatsRequest>,
) -> Result<Json<ApiResponse<HoldResponse>>, ApiError> {
    let mut session = req.session();
    let batch = state
        .hold_service
        .hold(trip_id, &req.seat_ids, &session)
        .await?;

    batch.merge_into(&mut session);

    Ok(Json(ApiResponse::ok(HoldResponse { batch, session })))
}

/// POST /api/seats/{seat_id}/release
pub async fn release_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<SeatId>,
    ValidatedJson(req): ValidatedJson<ReleaseRequest>,
) -> Result<Json<ApiResponse<ReleaseResponse>>, ApiError> {
    let seat = state
        .hold_service
        .release(seat_id, &HoldToken::new(req.hold_token))
        .await?;

    Ok(Json(ApiResponse::ok(ReleaseResponse {
        seat_id: seat.id,
        status: seat.status(),
    })))
}

/// POST /api/holds/contact
pub async fn attach_contact(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AttachContactRequest>,
) -> Result<Json<ApiResponse<ContactReceipt>>, ApiError> {
    let receipt = state
        .hold_service
        .attach_contact(&req.hold_set(), &req.name, &req.phone)
        .await?;

    Ok(Json(ApiResponse::ok(receipt)))
}

/// POST /api/holds/claim
pub async fn claim(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ClaimRequest>,
) -> Result<Json<ApiResponse<ClaimResponse>>, ApiError> {
    let code = ClaimCode::parse(&req.claim_code)?;
    let hold = state
        .claim_service
        .claim(&code, req.phone.as_deref())
        .await?;
    let session = hold.session();

    Ok(Json(ApiResponse::ok(ClaimResponse { hold, session })))
}
