//! Application builder: wires router, state, and the expiry sweeper into
//! a running server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use seatbook_auth::{ConfiguredAdminAuthority, RandomCodeIssuer};
use seatbook_core::config::AppConfig;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::traits::SystemClock;
use seatbook_database::store::SeatStoreDispatch;
use seatbook_service::{ProvisionService, ServiceContext};
use seatbook_worker::{ExpirySweepJob, JobRunner};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Wire the configured seat store into an [`AppState`].
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    tracing::info!(provider = ?config.store.provider, "Initializing seat store...");
    let store = SeatStoreDispatch::from_config(&config).await?;

    let ctx = ServiceContext::new(
        Arc::new(store.clone()),
        Arc::new(store),
        Arc::new(SystemClock::new()),
        Arc::new(RandomCodeIssuer::new()),
    );

    if !config.seed.trips.is_empty() {
        let reports = ProvisionService::new(ctx.clone())
            .seed(&config.seed.trips)
            .await?;
        let created: u64 = reports.iter().map(|r| r.created).sum();
        tracing::info!(trips = reports.len(), seats_created = created, "Seed data applied");
    }

    let authority = Arc::new(ConfiguredAdminAuthority::from_config(&config.admin)?);

    Ok(AppState::new(Arc::new(config), ctx, authority))
}

/// Runs the Seatbook server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting Seatbook v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Services ─────────────────────────────────────────
    let state = build_state(config.clone()).await?;

    // ── Step 2: Shutdown channel & expiry sweeper ────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper_handle = if config.sweeper.enabled {
        let job = Arc::new(ExpirySweepJob::new(state.expiry_service.clone()));
        let runner = JobRunner::new(job, Duration::from_secs(config.sweeper.interval_seconds));
        let cancel = shutdown_rx.clone();

        tracing::info!(
            interval_seconds = config.sweeper.interval_seconds,
            "Expiry sweeper started"
        );
        Some(tokio::spawn(async move { runner.run(cancel).await }))
    } else {
        tracing::info!("Expiry sweeper disabled");
        None
    };

    // ── Step 3: HTTP server ──────────────────────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Seatbook server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 4: Wait for background tasks ────────────────────────
    if let Some(handle) = sweeper_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Expiry sweeper did not stop within the grace period");
        }
    }

    tracing::info!("Seatbook server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use seatbook_auth::hash_admin_key;
    use seatbook_core::traits::ManualClock;
    use seatbook_core::types::SeatId;
    use seatbook_database::store::{MemoryStore, SeatFilter, SeatStore, TripCatalog};
    use seatbook_entity::seat::NewSeat;
    use seatbook_entity::trip::NewTrip;

    use super::*;

    const ADMIN_KEY: &str = "front-desk-key";

    struct TestApp {
        router: Router,
        clock: Arc<ManualClock>,
        trip_id: String,
        seats: Vec<SeatId>,
    }

    async fn test_app(seat_count: usize) -> TestApp {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));

        let trip = store
            .create_trip(NewTrip {
                title: "Jakarta - Bandung".to_string(),
                origin: "Jakarta".to_string(),
                destination: "Bandung".to_string(),
                departs_at: start + ChronoDuration::days(1),
                bus_type: "EXEC".to_string(),
                price: 150_000,
                admin_contact: Some("+6281100000000".to_string()),
            })
            .await
            .unwrap();
        let new_seats: Vec<NewSeat> = (1..=seat_count)
            .map(|n| NewSeat {
                trip_id: trip.id,
                code: format!("A{n}"),
            })
            .collect();
        store.insert_seats(&new_seats).await.unwrap();
        let mut seats = store.scan(&SeatFilter::new().trip(trip.id)).await.unwrap();
        seats.sort_by_key(|s| s.code[1..].parse::<u32>().unwrap());

        let mut config = AppConfig::default();
        config.admin.key_hashes = vec![hash_admin_key(ADMIN_KEY)];

        let ctx = ServiceContext::new(
            Arc::new(store.clone()),
            Arc::new(store),
            clock.clone(),
            Arc::new(RandomCodeIssuer::new()),
        );
        let authority = Arc::new(ConfiguredAdminAuthority::from_config(&config.admin).unwrap());
        let state = AppState::new(Arc::new(config), ctx, authority);

        TestApp {
            router: build_app(state),
            clock,
            trip_id: trip.id.to_string(),
            seats: seats.iter().map(|s| s.id).collect(),
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(0).await;
        let (status, body) = send(
            &app.router,
            Request::get("/api/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_seat_map_unknown_trip() {
        let app = test_app(0).await;
        let uri = format!("/api/trips/{}/seats", seatbook_core::types::TripId::new());
        let (status, body) = send(&app.router, Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_hold_contact_claim_book_flow() {
        let app = test_app(4).await;
        let hold_uri = format!("/api/trips/{}/holds", app.trip_id);

        let (status, body) = send(
            &app.router,
            post(&hold_uri, json!({ "seat_ids": [app.seats[0], app.seats[1]] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["held"].as_array().unwrap().len(), 2);
        let session = body["data"]["session"].clone();
        assert_eq!(session.as_array().unwrap().len(), 2);

        let (status, body) = send(
            &app.router,
            post(
                "/api/holds/contact",
                json!({ "holds": session, "name": "Sari", "phone": "+62 812-3456-7890" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["admin_contact"], "+6281100000000");
        let claim_code = body["data"]["claim_code"].as_str().unwrap().to_lowercase();

        let (status, body) = send(
            &app.router,
            post("/api/holds/claim", json!({ "claim_code": claim_code })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["seats"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["session"], session);

        let mut booking = post(
            "/api/admin/bookings",
            json!({ "seat_ids": [app.seats[0], app.seats[1]] }),
        );
        booking.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {ADMIN_KEY}").parse().unwrap(),
        );
        let (status, body) = send(&app.router, booking).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["booked"].as_array().unwrap().len(), 2);

        let (_, body) = send(
            &app.router,
            Request::get(format!("/api/trips/{}/seats", app.trip_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(body["data"]["available"], 2);
        assert_eq!(body["data"]["seats"][0]["status"], "BOOKED");
        assert_eq!(body["data"]["trip"]["price"], 150_000);
        assert_eq!(body["data"]["trip"]["bus_type"], "EXEC");
    }

    #[tokio::test]
    async fn test_quota_exceeded() {
        let app = test_app(6).await;
        let hold_uri = format!("/api/trips/{}/holds", app.trip_id);

        let (status, body) = send(
            &app.router,
            post(&hold_uri, json!({ "seat_ids": &app.seats[..3] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let session = body["data"]["session"].clone();

        let (status, body) = send(
            &app.router,
            post(
                &hold_uri,
                json!({ "seat_ids": &app.seats[3..5], "session": session }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "QUOTA_EXCEEDED");
    }

    #[tokio::test]
    async fn test_release_with_wrong_token() {
        let app = test_app(1).await;
        let hold_uri = format!("/api/trips/{}/holds", app.trip_id);
        send(&app.router, post(&hold_uri, json!({ "seat_ids": [app.seats[0]] }))).await;

        let (status, _) = send(
            &app.router,
            post(
                &format!("/api/seats/{}/release", app.seats[0]),
                json!({ "hold_token": "not-the-token" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_booking_requires_admin_key() {
        let app = test_app(1).await;

        let (status, _) = send(
            &app.router,
            post("/api/admin/bookings", json!({ "seat_ids": [app.seats[0]] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let mut request = post("/api/admin/bookings", json!({ "seat_ids": [app.seats[0]] }));
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer guessed".parse().unwrap());
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_hold_cannot_be_claimed() {
        let app = test_app(1).await;
        let hold_uri = format!("/api/trips/{}/holds", app.trip_id);
        let (_, body) = send(&app.router, post(&hold_uri, json!({ "seat_ids": [app.seats[0]] }))).await;
        let claim_code = body["data"]["held"][0]["claim_code"].clone();

        app.clock.advance(ChronoDuration::minutes(10));

        let (status, _) = send(
            &app.router,
            post("/api/holds/claim", json!({ "claim_code": claim_code })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_seat_list_rejected() {
        let app = test_app(1).await;
        let (status, body) = send(
            &app.router,
            post(&format!("/api/trips/{}/holds", app.trip_id), json!({ "seat_ids": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION");
    }

    #[tokio::test]
    async fn test_oversized_session_rejected() {
        let app = test_app(1).await;
        let session: Vec<_> = (0..65)
            .map(|n| {
                json!({
                    "seat_id": SeatId::new(),
                    "hold_token": format!("forged-{n}"),
                })
            })
            .collect();

        let (status, body) = send(
            &app.router,
            post(
                &format!("/api/trips/{}/holds", app.trip_id),
                json!({ "seat_ids": [app.seats[0]], "session": session }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION");
    }

    #[tokio::test]
    async fn test_seeded_trip_is_holdable_after_startup() {
        let mut config = AppConfig::default();
        config.sweeper.enabled = false;
        config.seed.trips = vec![seatbook_core::config::SeedTrip {
            title: "Bogor - Bandung".to_string(),
            origin: "Bogor".to_string(),
            destination: "Bandung".to_string(),
            departs_at: Utc::now() + ChronoDuration::days(1),
            bus_type: "EXEC".to_string(),
            price: 120_000,
            admin_contact: None,
            rows: 2,
            seats_per_row: 2,
            prefix: String::new(),
        }];

        let state = build_state(config).await.expect("state");
        let trips = state.ctx.trips.list_trips().await.unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].capacity_total, 4);
        let router = build_app(state);

        let (status, body) = send(
            &router,
            Request::get(format!("/api/trips/{}/seats", trips[0].id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["available"], 4);
        let seat_id = body["data"]["seats"][0]["id"].clone();

        let (status, body) = send(
            &router,
            post(
                &format!("/api/trips/{}/holds", trips[0].id),
                json!({ "seat_ids": [seat_id] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["held"].as_array().unwrap().len(), 1);
    }
}
