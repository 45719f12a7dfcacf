//! Route definitions for the chat domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{bookings, chats};
use super::middleware::ChatState;
use crate::gateway::socket;

/// Authenticated chat routes
fn chat_routes() -> Router<ChatState> {
    Router::new()
        .route("/v1/chats", post(chats::start_chat))
        .route("/v1/chats/{id}", get(chats::get_chat_history))
        .route("/v1/users/{user_id}/chats", get(chats::list_user_chats))
        .route("/v1/bands/{band_id}/chats", get(chats::list_band_chats))
}

/// Live delivery websocket route
fn live_routes() -> Router<ChatState> {
    Router::new().route("/v1/chat/ws", get(socket::chat_socket))
}

/// Internal integration routes (booking callbacks, administration)
fn internal_routes() -> Router<ChatState> {
    Router::new()
        .route("/internal/bookings/events", post(bookings::booking_event))
        .route("/internal/chats/{id}", delete(chats::delete_chat))
}

/// Create all chat domain API routes
pub fn routes() -> Router<ChatState> {
    Router::new()
        .merge(chat_routes())
        .merge(live_routes())
        .merge(internal_routes())
}
