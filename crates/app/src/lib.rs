//! Stagelink application composition root
//!
//! Composes the chat domain router with its backing services.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use stagelink_auth::{AuthBackend, AuthConfig};
use stagelink_bands::{BandDirectory, PgBandDirectory};
use stagelink_chat::{ChatState, ConversationStore, PgConversationStore};
use stagelink_common::Config;

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let auth_config = AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
    };
    let auth = AuthBackend::new(auth_config);

    let store: Arc<dyn ConversationStore> = Arc::new(PgConversationStore::new(pool.clone()));
    let bands: Arc<dyn BandDirectory> = Arc::new(PgBandDirectory::new(pool));

    let chat_state = ChatState::new(store, bands, auth);

    // Build router — compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Stagelink API v0.0.1-SNAPSHOT" }),
        )
        .merge(stagelink_chat::routes().with_state(chat_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
