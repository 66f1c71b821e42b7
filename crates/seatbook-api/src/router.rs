//! Route definitions for the Seatbook HTTP API.
//!
//! All routes are mounted under `/api` and receive `AppState` through
//! Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(trip_routes())
        .merge(hold_routes())
        .merge(admin_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Public seat maps and hold placement
fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/trips/{trip_id}/seats", get(handlers::trips::seat_map))
        .route("/trips/{trip_id}/holds", post(handlers::holds::hold_seats))
}

/// Release, contact attachment, and claim
fn hold_routes() -> Router<AppState> {
    Router::new()
        .route("/seats/{seat_id}/release", post(handlers::holds::release_seat))
        .route("/holds/contact", post(handlers::holds::attach_contact))
        .route("/holds/claim", post(handlers::holds::claim))
}

/// Admin-only booking finalization
fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/bookings", post(handlers::admin::create_bookings))
}
