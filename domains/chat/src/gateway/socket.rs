//! Websocket transport for the live delivery gateway
//!
//! One socket task per connection: a writer task drains the connection's
//! outbound channel into the sink, while the read loop dispatches inbound
//! `join` / `message` events. Authorization failures on a message event are
//! reported back to the sender, never silently dropped.

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::ChatState;
use crate::gateway::{InboundEvent, OutboundEvent};

/// Upgrade handler for `GET /v1/chat/ws`
pub async fn chat_socket(State(state): State<ChatState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: ChatState) {
    let connection_id = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundEvent>();

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(payload) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(WsMessage::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = stream.next().await {
        match frame {
            WsMessage::Text(text) => {
                handle_event(&state, connection_id, &tx, &text).await;
            }
            WsMessage::Close(_) => break,
            _ => {}
        }
    }

    state.registry.disconnect(connection_id).await;
    writer.abort();

    tracing::debug!(connection_id = %connection_id, "chat socket closed");
}

async fn handle_event(
    state: &ChatState,
    connection_id: Uuid,
    tx: &mpsc::UnboundedSender<OutboundEvent>,
    raw: &str,
) {
    let event = match serde_json::from_str::<InboundEvent>(raw) {
        Ok(event) => event,
        Err(e) => {
            let _ = tx.send(OutboundEvent::Error {
                code: "INVALID_EVENT".to_string(),
                message: e.to_string(),
            });
            return;
        }
    };

    match event {
        InboundEvent::Join { user_id } => {
            state.registry.join(user_id, connection_id, tx.clone()).await;
            tracing::debug!(
                participant_id = %user_id,
                connection_id = %connection_id,
                "participant joined live delivery"
            );
        }
        InboundEvent::Message(send) => {
            if let Err(err) = state.gateway.send_message(send).await {
                let _ = tx.send(OutboundEvent::Error {
                    code: err.error_code().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }
}
