//! Live delivery gateway
//!
//! Volatile side of the chat subsystem: a process-local presence map plus
//! opportunistic push of newly persisted messages. Delivery is best-effort;
//! a disconnected recipient simply finds the message in history later.
//!
//! The presence map is per-process state. Under a multi-instance deployment
//! it is not a source of truth; presence would need to move to a shared
//! registry before scaling horizontally.

pub mod registry;
pub mod socket;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stagelink_common::Result;
use uuid::Uuid;

use crate::domain::entities::{Message, StoredMessage};
use crate::domain::error::ChatError;
use crate::domain::ids::{ConversationId, MessageId};
use crate::repository::ConversationStore;

pub use registry::PresenceRegistry;
pub use socket::chat_socket;

/// Inbound "send message" socket event
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageEvent {
    pub conversation_id: ConversationId,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub message: String,
}

/// Events a connected client may send
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Declare which participant this connection belongs to
    Join { user_id: Uuid },
    /// Send a text message into an existing conversation
    Message(SendMessageEvent),
}

/// Message payload pushed to a connected recipient
#[derive(Debug, Clone, Serialize)]
pub struct MessagePayload {
    pub conversation_id: ConversationId,
    pub message: StoredMessage,
}

/// Events pushed to a connected client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    Message(MessagePayload),
    Error { code: String, message: String },
}

/// Persists inbound socket messages and pushes them to connected recipients
pub struct LiveDeliveryGateway {
    store: Arc<dyn ConversationStore>,
    registry: PresenceRegistry,
}

impl LiveDeliveryGateway {
    pub fn new(store: Arc<dyn ConversationStore>, registry: PresenceRegistry) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &PresenceRegistry {
        &self.registry
    }

    /// Handle an inbound "send message" event.
    ///
    /// The conversation must exist and both actors must be its owners;
    /// violations surface to the caller rather than being dropped.
    pub async fn send_message(&self, event: SendMessageEvent) -> Result<Message> {
        let conversation = self
            .store
            .get_by_id(event.conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        if !conversation.is_owner(event.sender_id) || !conversation.is_owner(event.recipient_id) {
            return Err(ChatError::InvalidMessageActors.into());
        }

        let message = Message::text(
            MessageId::new(),
            event.sender_id,
            event.recipient_id,
            event.message,
        )?;

        let stored = self
            .store
            .append_message(conversation.id, &message, false)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        self.deliver(conversation.id, &stored).await;

        Ok(stored)
    }

    /// Best-effort push to the recipient's connection, if any.
    ///
    /// No timeout and no retry; the durable copy is already written.
    pub async fn deliver(&self, conversation_id: ConversationId, message: &Message) {
        let payload = MessagePayload {
            conversation_id,
            message: message.to_stored(),
        };

        let delivered = self
            .registry
            .push(message.recipient_id, OutboundEvent::Message(payload))
            .await;

        if delivered {
            tracing::debug!(
                conversation_id = %conversation_id,
                recipient_id = %message.recipient_id,
                "pushed message to live connection"
            );
        } else {
            tracing::debug!(
                conversation_id = %conversation_id,
                recipient_id = %message.recipient_id,
                "recipient not connected; message stored only"
            );
        }
    }
}
