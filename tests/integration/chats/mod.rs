//! Chat handler integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{authed_request, create_test_jwt, parse_body, plain_request, ChatTestApp};

mod test_start_chat {
    use super::*;

    #[tokio::test]
    async fn test_start_chat_returns_201() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let band = app.seed_band("The Lowlands", vec![Uuid::new_v4()]).await;
        let jwt = create_test_jwt(user, "client");

        let req = authed_request(
            Method::POST,
            "/v1/chats",
            &jwt,
            Some(json!({"band_id": band})),
        );

        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = parse_body(resp).await;
        assert_eq!(body["user_id"], user.to_string());
        assert_eq!(body["band_id"], band.to_string());
        assert!(body["messages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_chat_twice_returns_same_conversation() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let band = app.seed_band("The Lowlands", vec![]).await;
        let jwt = create_test_jwt(user, "client");

        let first = app
            .router()
            .oneshot(authed_request(
                Method::POST,
                "/v1/chats",
                &jwt,
                Some(json!({"band_id": band})),
            ))
            .await
            .unwrap();
        let second = app
            .router()
            .oneshot(authed_request(
                Method::POST,
                "/v1/chats",
                &jwt,
                Some(json!({"band_id": band})),
            ))
            .await
            .unwrap();

        let first_body = parse_body(first).await;
        let second_body = parse_body(second).await;
        assert_eq!(first_body["id"], second_body["id"]);
    }

    #[tokio::test]
    async fn test_start_chat_requires_auth() {
        let app = ChatTestApp::new();
        let band = app.seed_band("The Lowlands", vec![]).await;

        let req = plain_request(Method::POST, "/v1/chats", Some(json!({"band_id": band})));
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_start_chat_malformed_band_id_returns_400() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let jwt = create_test_jwt(user, "client");

        let req = authed_request(
            Method::POST,
            "/v1/chats",
            &jwt,
            Some(json!({"band_id": "not-a-uuid"})),
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

mod test_chat_history {
    use super::*;

    /// Start a conversation and inject one booking event into it
    async fn conversation_with_booking(
        app: &ChatTestApp,
        user: Uuid,
        band: Uuid,
    ) -> (String, Uuid) {
        let jwt = create_test_jwt(user, "client");
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

        (conversation_id, booking_id)
    }

    #[tokio::test]
    async fn test_history_includes_participants_and_messages() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let band = app.seed_band("The Lowlands", vec![]).await;
        let (conversation_id, booking_id) = conversation_with_booking(&app, user, band).await;

        let jwt = create_test_jwt(user, "client");
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
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        assert_eq!(body["user"]["first_name"], "Nina");
        assert_eq!(body["band"]["name"], "The Lowlands");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0]["content"].is_null());
        assert_eq!(
            messages[0]["booking"]["booking_id"],
            booking_id.to_string()
        );
    }

    #[tokio::test]
    async fn test_band_member_view_marks_band_messages_read() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let member = Uuid::new_v4();
        let band = app.seed_band("The Lowlands", vec![member]).await;
        let (conversation_id, _) = conversation_with_booking(&app, user, band).await;

        // The injected booking message is addressed to the band and unread
        let member_jwt = create_test_jwt(member, "musician");
        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                &format!("/v1/chats/{}", conversation_id),
                &member_jwt,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body["unread_messages_count"], 1);

        // Viewing flipped the receipt: a second view has nothing unread
        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                &format!("/v1/chats/{}", conversation_id),
                &member_jwt,
                None,
            ))
            .await
            .unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body["unread_messages_count"], 0);
        assert_eq!(body["messages"][0]["is_read"], true);
    }

    #[tokio::test]
    async fn test_non_member_is_rejected_without_side_effects() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let band = app.seed_band("The Lowlands", vec![Uuid::new_v4()]).await;
        let (conversation_id, _) = conversation_with_booking(&app, user, band).await;

        let outsider_jwt = create_test_jwt(Uuid::new_v4(), "musician");
        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                &format!("/v1/chats/{}", conversation_id),
                &outsider_jwt,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // The booking message stayed unread for the band side
        let member = Uuid::new_v4();
        app.bands.insert_band(band, vec![member]);
        let member_jwt = create_test_jwt(member, "musician");
        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                &format!("/v1/chats/{}", conversation_id),
                &member_jwt,
                None,
            ))
            .await
            .unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body["unread_messages_count"], 1);
    }

    #[tokio::test]
    async fn test_unknown_conversation_returns_404() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let jwt = create_test_jwt(user, "client");

        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                &format!("/v1/chats/{}", Uuid::new_v4()),
                &jwt,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

mod test_chat_listings {
    use super::*;

    #[tokio::test]
    async fn test_list_user_chats_returns_own_threads() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let band_a = app.seed_band("The Lowlands", vec![]).await;
        let band_b = app.seed_band("Night Shift", vec![]).await;
        let jwt = create_test_jwt(user, "client");

        for band in [band_a, band_b] {
            app.router()
                .oneshot(authed_request(
                    Method::POST,
                    "/v1/chats",
                    &jwt,
                    Some(json!({"band_id": band})),
                ))
                .await
                .unwrap();
        }

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
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row["user"]["id"], user.to_string());
            assert!(row["last_message"].is_null());
        }
    }

    #[tokio::test]
    async fn test_list_user_chats_rejects_other_identity() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let jwt = create_test_jwt(user, "client");

        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                &format!("/v1/users/{}/chats", Uuid::new_v4()),
                &jwt,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_band_chats_requires_membership() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let member = Uuid::new_v4();
        let band = app.seed_band("The Lowlands", vec![member]).await;
        let jwt = create_test_jwt(user, "client");

        app.router()
            .oneshot(authed_request(
                Method::POST,
                "/v1/chats",
                &jwt,
                Some(json!({"band_id": band})),
            ))
            .await
            .unwrap();

        let member_jwt = create_test_jwt(member, "musician");
        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                &format!("/v1/bands/{}/chats", band),
                &member_jwt,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let outsider_jwt = create_test_jwt(Uuid::new_v4(), "musician");
        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                &format!("/v1/bands/{}/chats", band),
                &outsider_jwt,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}

mod test_delete_chat {
    use super::*;

    #[tokio::test]
    async fn test_internal_delete_removes_conversation() {
        let app = ChatTestApp::new();
        let user = app.seed_user("Nina", "Vermeer").await;
        let band = app.seed_band("The Lowlands", vec![]).await;
        let jwt = create_test_jwt(user, "client");

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
                Method::DELETE,
                &format!("/internal/chats/{}", conversation_id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        // gone for good
        let resp = app
            .router()
            .oneshot(plain_request(
                Method::DELETE,
                &format!("/internal/chats/{}", conversation_id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

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
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
