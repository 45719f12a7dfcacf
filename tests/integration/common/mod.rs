//! Common test utilities and fixtures for chat API integration tests
//!
//! Provides a fully wired chat router over the in-memory store and mock
//! band directory, plus JWT and request helpers.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use stagelink_auth::{AuthBackend, AuthConfig};
use stagelink_bands::MockBandDirectory;
use stagelink_chat::{BandSummary, ChatState, InMemoryConversationStore, UserSummary};

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only";

/// Test application with handles to the seeded backends
pub struct ChatTestApp {
    pub state: ChatState,
    pub store: Arc<InMemoryConversationStore>,
    pub bands: Arc<MockBandDirectory>,
}

impl ChatTestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryConversationStore::new());
        let bands = Arc::new(MockBandDirectory::new());
        let auth = AuthBackend::new(AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            issuer: None,
            audience: None,
        });

        let state = ChatState::new(store.clone(), bands.clone(), auth);
        Self {
            state,
            store,
            bands,
        }
    }

    pub fn router(&self) -> Router {
        stagelink_chat::routes().with_state(self.state.clone())
    }

    /// Seed a user profile with a fresh id
    pub async fn seed_user(&self, first_name: &str, family_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .register_user(UserSummary {
                id,
                first_name: first_name.to_string(),
                family_name: family_name.to_string(),
                image_url: None,
            })
            .await;
        id
    }

    /// Seed a band profile with the given member roster
    pub async fn seed_band(&self, name: &str, members: Vec<Uuid>) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .register_band(BandSummary {
                id,
                name: name.to_string(),
                image_url: None,
            })
            .await;
        self.bands.insert_band(id, members);
        id
    }
}

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    role: String,
    iat: u64,
    exp: u64,
}

/// Mint an HS256 access token for the given principal
pub fn create_test_jwt(principal_id: Uuid, role: &str) -> String {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = TestClaims {
        sub: principal_id.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + 3600,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_ref()),
    )
    .expect("failed to encode test JWT")
}

/// Build an authenticated request
pub fn authed_request(method: Method, uri: &str, jwt: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", jwt));

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Build an unauthenticated request (internal routes, negative auth tests)
pub fn plain_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Parse response body as JSON Value
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
