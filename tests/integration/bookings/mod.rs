//! Booking-event injector integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{authed_request, create_test_jwt, parse_body, plain_request, ChatTestApp};

#[tokio::test]
async fn test_booking_event_creates_conversation_lazily() {
    let app = ChatTestApp::new();
    let user = app.seed_user("Jonas", "Berg").await;
    let band = app.seed_band("Copper Sky", vec![]).await;
    let booking_id = Uuid::new_v4();

    let resp = app
        .router()
        .oneshot(plain_request(
            Method::POST,
            "/internal/bookings/events",
            Some(json!({
                "user_id": user,
                "band_id": band,
                "booking_id": booking_id,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    // The user now has exactly one conversation, holding the booking message
    let jwt = create_test_jwt(user, "client");
    let resp = app
        .router()
        .oneshot(authed_request(
            Method::GET,
            &format!("/v1/users/{}/chats", user),
            &jwt,
            None,
        ))
        .await
        .unwrap();
    let body = parse_body(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0]["last_message"]["booking"]["booking_id"],
        booking_id.to_string()
    );
    assert!(rows[0]["last_message"]["content"].is_null());
}

#[tokio::test]
async fn test_booking_event_appends_to_existing_conversation() {
    let app = ChatTestApp::new();
    let user = app.seed_user("Jonas", "Berg").await;
    let band = app.seed_band("Copper Sky", vec![]).await;
    let jwt = create_test_jwt(user, "client");

    // Scenario: conversation started explicitly, then a booking fires
    let resp = app
        .router()
        .oneshot(authed_request(
            Method::POST,
            "/v1/chats",
            &jwt,
            Some(json!({"band_id": band})),
        ))
        .await
        .unwrap();
    let conversation_id = parse_body(resp).await["id"].as_str().unwrap().to_string();

    let resp = app
        .router()
        .oneshot(plain_request(
            Method::POST,
            "/internal/bookings/events",
            Some(json!({
                "user_id": user,
                "band_id": band,
                "booking_id": Uuid::new_v4(),
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = app
        .router()
        .oneshot(authed_request(
            Method::GET,
            &format!("/v1/chats/{}", conversation_id),
            &jwt,
            None,
        ))
        .await
        .unwrap();
    let body = parse_body(resp).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);

    // No duplicate conversation row appeared
    let resp = app
        .router()
        .oneshot(authed_request(
            Method::GET,
            &format!("/v1/users/{}/chats", user),
            &jwt,
            None,
        ))
        .await
        .unwrap();
    let body = parse_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_repeated_booking_events_grow_one_thread() {
    let app = ChatTestApp::new();
    let user = app.seed_user("Jonas", "Berg").await;
    let band = app.seed_band("Copper Sky", vec![]).await;

    for _ in 0..3 {
        let resp = app
            .router()
            .oneshot(plain_request(
                Method::POST,
                "/internal/bookings/events",
                Some(json!({
                    "user_id": user,
                    "band_id": band,
                    "booking_id": Uuid::new_v4(),
                })),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    let jwt = create_test_jwt(user, "client");
    let resp = app
        .router()
        .oneshot(authed_request(
            Method::GET,
            &format!("/v1/users/{}/chats", user),
            &jwt,
            None,
        ))
        .await
        .unwrap();
    let listing = parse_body(resp).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let conversation_id = listing[0]["id"].as_str().unwrap().to_string();
    let resp = app
        .router()
        .oneshot(authed_request(
            Method::GET,
            &format!("/v1/chats/{}", conversation_id),
            &jwt,
            None,
        ))
        .await
        .unwrap();
    let body = parse_body(resp).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_booking_event_with_malformed_payload_is_rejected() {
    let app = ChatTestApp::new();

    let resp = app
        .router()
        .oneshot(plain_request(
            Method::POST,
            "/internal/bookings/events",
            Some(json!({"user_id": "not-a-uuid"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
