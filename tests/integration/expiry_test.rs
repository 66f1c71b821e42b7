//! Hold expiry through the sweeper, the seat map, and re-holds.

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use seatbook_database::store::SeatStore;
use seatbook_entity::seat::SeatStatus;

use crate::helpers::{ADMIN_KEY, TestApp};

#[tokio::test]
async fn test_sweeper_releases_elapsed_hold() {
    let app = TestApp::new(2).await;
    app.hold(&[0], json!([])).await;

    app.clock.advance(Duration::minutes(9));
    let report = app.state.expiry_service.sweep().await.unwrap();
    assert_eq!(report.expired, 0);

    app.clock.advance(Duration::minutes(1));
    let report = app.state.expiry_service.sweep().await.unwrap();
    assert_eq!(report.expired, 1);

    let seat = app.store.get(app.seats[0]).await.unwrap().unwrap();
    assert_eq!(seat.status(), SeatStatus::Available);
}

#[tokio::test]
async fn test_seat_map_shows_elapsed_hold_as_available() {
    let app = TestApp::new(2).await;
    app.hold(&[1], json!([])).await;

    let map = app.seat_map().await;
    assert_eq!(map.data()["available"], 1);
    assert!(map.data()["seats"][1].get("hold_token").is_none());

    app.clock.advance(Duration::minutes(10));
    let map = app.seat_map().await;
    assert_eq!(map.status, StatusCode::OK);
    assert_eq!(map.data()["available"], 2);
}

#[tokio::test]
async fn test_elapsed_hold_can_be_taken_by_another_session() {
    let app = TestApp::new(1).await;
    let first = app.hold(&[0], json!([])).await;
    let stale_session = first.data()["session"].clone();

    app.clock.advance(Duration::minutes(11));
    let second = app.hold(&[0], json!([])).await;
    assert_eq!(second.data()["held"].as_array().unwrap().len(), 1);

    // The first holder's token is no longer valid.
    let release = app
        .request(
            "POST",
            &format!("/api/seats/{}/release", app.seats[0]),
            Some(json!({ "hold_token": stale_session[0]["hold_token"] })),
            None,
        )
        .await;
    assert_eq!(release.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_contact_does_not_extend_hold() {
    let app = TestApp::new(1).await;
    let held = app.hold(&[0], json!([])).await;
    let expires_at = held.data()["held"][0]["expires_at"].clone();

    app.clock.advance(Duration::minutes(5));
    let receipt = app
        .request(
            "POST",
            "/api/holds/contact",
            Some(json!({
                "holds": held.data()["session"],
                "name": "Dewi",
                "phone": "+6285700001111",
            })),
            None,
        )
        .await;
    assert_eq!(receipt.status, StatusCode::OK);
    assert_eq!(receipt.data()["expires_at"], expires_at);
}

#[tokio::test]
async fn test_booked_seat_survives_sweep() {
    let app = TestApp::new(1).await;
    app.hold(&[0], json!([])).await;

    let booked = app
        .request(
            "POST",
            "/api/admin/bookings",
            Some(json!({ "seat_ids": [app.seats[0]] })),
            Some(ADMIN_KEY),
        )
        .await;
    assert_eq!(booked.status, StatusCode::OK);

    app.clock.advance(Duration::hours(1));
    app.state.expiry_service.sweep().await.unwrap();

    let seat = app.store.get(app.seats[0]).await.unwrap().unwrap();
    assert_eq!(seat.status(), SeatStatus::Booked);
}
