//! Per-session hold quota.

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_quota_counts_live_session_holds() {
    let app = TestApp::new(8).await;

    let first = app.hold(&[0, 1, 2], json!([])).await;
    assert_eq!(first.status, StatusCode::OK);
    let session = first.data()["session"].clone();

    let over = app.hold(&[3, 4], session.clone()).await;
    assert_eq!(over.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(over.body["error"], "QUOTA_EXCEEDED");

    let fourth = app.hold(&[3], session).await;
    assert_eq!(fourth.status, StatusCode::OK);
    assert_eq!(fourth.data()["session"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_released_and_expired_holds_free_quota() {
    let app = TestApp::new(8).await;

    let held = app.hold(&[0, 1, 2, 3], json!([])).await;
    let session = held.data()["session"].clone();

    let release = app
        .request(
            "POST",
            &format!("/api/seats/{}/release", session[0]["seat_id"].as_str().unwrap()),
            Some(json!({ "hold_token": session[0]["hold_token"] })),
            None,
        )
        .await;
    assert_eq!(release.status, StatusCode::OK);
    assert_eq!(release.data()["status"], "AVAILABLE");

    let again = app.hold(&[4], session.clone()).await;
    assert_eq!(again.status, StatusCode::OK);

    app.clock.advance(Duration::minutes(10));
    let after_expiry = app.hold(&[5, 6, 7], again.data()["session"].clone()).await;
    assert_eq!(after_expiry.status, StatusCode::OK);
    assert_eq!(after_expiry.data()["held"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_forged_session_entries_do_not_count() {
    let app = TestApp::new(6).await;
    let forged: Value = json!([
        { "seat_id": app.seats[4], "hold_token": "forged-1" },
        { "seat_id": app.seats[5], "hold_token": "forged-2" },
    ]);

    let response = app.hold(&[0, 1, 2, 3], forged).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["held"].as_array().unwrap().len(), 4);
}
