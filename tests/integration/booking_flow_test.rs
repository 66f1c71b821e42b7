//! Hold, contact, claim, and admin booking end to end.

use axum::http::StatusCode;
use serde_json::json;

use seatbook_database::store::SeatStore;
use seatbook_entity::seat::SeatStatus;

use crate::helpers::{ADMIN_KEY, TestApp};

#[tokio::test]
async fn test_full_booking_flow() {
    let app = TestApp::new(10).await;

    let held = app.hold(&[2, 3], json!([])).await;
    assert_eq!(held.status, StatusCode::OK);
    assert_eq!(held.data()["held"].as_array().unwrap().len(), 2);
    let session = held.data()["session"].clone();

    let receipt = app
        .request(
            "POST",
            "/api/holds/contact",
            Some(json!({ "holds": session, "name": "Budi", "phone": "0812 3456 7890" })),
            None,
        )
        .await;
    assert_eq!(receipt.status, StatusCode::OK);
    let claim_code = receipt.data()["claim_code"].as_str().unwrap().to_string();
    assert_eq!(receipt.data()["seats"].as_array().unwrap().len(), 2);

    // A different device recovers the same tokens.
    let claimed = app
        .request(
            "POST",
            "/api/holds/claim",
            Some(json!({ "claim_code": claim_code, "phone": "081234567890" })),
            None,
        )
        .await;
    assert_eq!(claimed.status, StatusCode::OK);
    assert_eq!(claimed.data()["session"], session);

    let booked = app
        .request(
            "POST",
            "/api/admin/bookings",
            Some(json!({ "seat_ids": [app.seats[2], app.seats[3]] })),
            Some(ADMIN_KEY),
        )
        .await;
    assert_eq!(booked.status, StatusCode::OK);
    let codes: Vec<&str> = booked.data()["booked"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["booking_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes.len(), 2);
    assert_ne!(codes[0], codes[1]);

    for index in [2, 3] {
        let seat = app.store.get(app.seats[index]).await.unwrap().unwrap();
        assert_eq!(seat.status(), SeatStatus::Booked);
        assert_eq!(seat.booking().unwrap().contact.as_ref().unwrap().name, "Budi");
    }

    // Booked seats can no longer be claimed or released.
    let reclaim = app
        .request(
            "POST",
            "/api/holds/claim",
            Some(json!({ "claim_code": claim_code })),
            None,
        )
        .await;
    assert_eq!(reclaim.status, StatusCode::NOT_FOUND);

    let token = session[0]["hold_token"].clone();
    let release = app
        .request(
            "POST",
            &format!("/api/seats/{}/release", session[0]["seat_id"].as_str().unwrap()),
            Some(json!({ "hold_token": token })),
            None,
        )
        .await;
    assert_eq!(release.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_claim_with_wrong_phone_is_not_found() {
    let app = TestApp::new(2).await;
    let held = app.hold(&[0], json!([])).await;
    let session = held.data()["session"].clone();

    let receipt = app
        .request(
            "POST",
            "/api/holds/contact",
            Some(json!({ "holds": session, "name": "Rina", "phone": "+62 811 000 111" })),
            None,
        )
        .await;
    let claim_code = receipt.data()["claim_code"].clone();

    let claimed = app
        .request(
            "POST",
            "/api/holds/claim",
            Some(json!({ "claim_code": claim_code, "phone": "+62 899 999 999" })),
            None,
        )
        .await;
    assert_eq!(claimed.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seat_contested_by_two_sessions() {
    let app = TestApp::new(3).await;

    let first = app.hold(&[1], json!([])).await;
    assert_eq!(first.data()["held"].as_array().unwrap().len(), 1);

    let second = app.hold(&[0, 1], json!([])).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.data()["held"].as_array().unwrap().len(), 1);
    let rejected = second.data()["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["error"], "Conflict");
    assert_eq!(rejected[0]["status"], "HOLD");
}

#[tokio::test]
async fn test_non_admin_cannot_book() {
    let app = TestApp::new(1).await;
    app.hold(&[0], json!([])).await;

    let response = app
        .request(
            "POST",
            "/api/admin/bookings",
            Some(json!({ "seat_ids": [app.seats[0]] })),
            Some("someone-else"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let seat = app.store.get(app.seats[0]).await.unwrap().unwrap();
    assert_eq!(seat.status(), SeatStatus::Hold);
}
