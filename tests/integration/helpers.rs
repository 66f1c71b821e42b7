//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use seatbook_api::{AppState, build_app};
use seatbook_auth::{ConfiguredAdminAuthority, RandomCodeIssuer, hash_admin_key};
use seatbook_core::config::AppConfig;
use seatbook_core::traits::ManualClock;
use seatbook_core::types::{SeatId, TripId};
use seatbook_database::store::{MemoryStore, SeatFilter, SeatStore, TripCatalog};
use seatbook_entity::seat::NewSeat;
use seatbook_entity::trip::NewTrip;
use seatbook_service::ServiceContext;

/// Admin key accepted by every test app
pub const ADMIN_KEY: &str = "integration-admin-key";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: MemoryStore,
    /// Clock driving hold expiry
    pub clock: Arc<ManualClock>,
    /// State shared with the router
    pub state: AppState,
    /// The seeded trip
    pub trip_id: TripId,
    /// Seeded seats A1..An in label order
    pub seats: Vec<SeatId>,
}

/// Response captured from a test request
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Parsed JSON body, `Null` if the body was not JSON
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    /// Create a test application with one trip of `seat_count` seats
    pub async fn new(seat_count: usize) -> Self {
        let store = MemoryStore::new();
        let clock = Arc::new(ManualClock::new(start_time()));

        let trip = store
            .create_trip(NewTrip {
                title: "Yogyakarta - Semarang".to_string(),
                origin: "Yogyakarta".to_string(),
                destination: "Semarang".to_string(),
                departs_at: start_time() + Duration::days(3),
                bus_type: "SLEEPER".to_string(),
                price: 210_000,
                admin_contact: Some("+6281299990000".to_string()),
            })
            .await
            .expect("Failed to create trip");

        let new_seats: Vec<NewSeat> = (1..=seat_count)
            .map(|n| NewSeat {
                trip_id: trip.id,
                code: format!("A{n}"),
            })
            .collect();
        store
            .insert_seats(&new_seats)
            .await
            .expect("Failed to seed seats");

        let mut seats = store
            .scan(&SeatFilter::new().trip(trip.id))
            .await
            .expect("Failed to scan seats");
        seats.sort_by_key(|s| s.code[1..].parse::<u32>().unwrap_or(0));

        let mut config = AppConfig::default();
        config.admin.key_hashes = vec![hash_admin_key(ADMIN_KEY)];

        let ctx = ServiceContext::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            clock.clone(),
            Arc::new(RandomCodeIssuer::new()),
        );
        let authority = Arc::new(
            ConfiguredAdminAuthority::from_config(&config.admin).expect("Invalid admin config"),
        );
        let state = AppState::new(Arc::new(config), ctx, authority);

        Self {
            router: build_app(state.clone()),
            store,
            clock,
            state,
            trip_id: trip.id,
            seats: seats.iter().map(|s| s.id).collect(),
        }
    }

    /// Make a request; `admin_key` is sent as a Bearer credential
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        admin_key: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(key) = admin_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Hold seats by index, presenting `session`
    pub async fn hold(&self, indices: &[usize], session: Value) -> TestResponse {
        let seat_ids: Vec<SeatId> = indices.iter().map(|&i| self.seats[i]).collect();
        self.request(
            "POST",
            &format!("/api/trips/{}/holds", self.trip_id),
            Some(json!({ "seat_ids": seat_ids, "session": session })),
            None,
        )
        .await
    }

    /// Current seat map
    pub async fn seat_map(&self) -> TestResponse {
        self.request(
            "GET",
            &format!("/api/trips/{}/seats", self.trip_id),
            None,
            None,
        )
        .await
    }
}

/// Fixed start of every test clock
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}
