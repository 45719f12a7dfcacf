//! Chat management API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagelink_auth::AuthUser;
use stagelink_common::{Error, Result, ValidatedJson};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ChatState;
use crate::domain::entities::{BookingDetails, Conversation, Message};
use crate::domain::ids::{BandRef, ConversationId, MessageId, UserRef};
use crate::domain::views::{BandSummary, ConversationSummary, UserSummary};
use crate::service::ChatHistory;

/// Request for starting a conversation with a band
#[derive(Debug, Deserialize, Validate)]
pub struct StartChatRequest {
    /// Band on the other side of the thread
    pub band_id: Uuid,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: MessageId,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: Option<String>,
    pub booking: Option<BookingDetails>,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            recipient_id: m.recipient_id,
            content: m.content,
            booking: m.booking,
            sent_at: m.sent_at,
            is_read: m.is_read,
        }
    }
}

/// Conversation response DTO
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub id: ConversationId,
    pub user_id: Uuid,
    pub band_id: Uuid,
    pub messages: Vec<MessageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ChatResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id.as_uuid(),
            band_id: c.band_id.as_uuid(),
            messages: c.messages.into_iter().map(Into::into).collect(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// History view response DTO
#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub id: ConversationId,
    pub user: UserSummary,
    pub band: BandSummary,
    pub messages: Vec<MessageResponse>,
    pub unread_messages_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChatHistory> for ChatHistoryResponse {
    fn from(h: ChatHistory) -> Self {
        Self {
            id: h.view.id,
            user: h.view.user,
            band: h.view.band,
            messages: h.view.messages.into_iter().map(Into::into).collect(),
            unread_messages_count: h.unread_messages_count,
            created_at: h.view.created_at,
            updated_at: h.view.updated_at,
        }
    }
}

/// Listing row response DTO
#[derive(Debug, Serialize)]
pub struct ChatSummaryResponse {
    pub id: ConversationId,
    pub user: UserSummary,
    pub band: BandSummary,
    pub last_message: Option<MessageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationSummary> for ChatSummaryResponse {
    fn from(s: ConversationSummary) -> Self {
        Self {
            id: s.id,
            user: s.user,
            band: s.band,
            last_message: s.last_message.map(Into::into),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Start a conversation with a band (idempotent per pair)
pub async fn start_chat(
    AuthUser(principal): AuthUser,
    State(state): State<ChatState>,
    ValidatedJson(req): ValidatedJson<StartChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>)> {
    let conversation = state
        .service
        .start_conversation(&principal, BandRef::from_uuid(req.band_id))
        .await?;

    Ok((StatusCode::CREATED, Json(conversation.into())))
}

/// Fetch a conversation's history; viewing marks inbound messages read
pub async fn get_chat_history(
    AuthUser(principal): AuthUser,
    State(state): State<ChatState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatHistoryResponse>> {
    let history = state
        .service
        .get_history(&principal, ConversationId::from_uuid(id))
        .await?;

    Ok(Json(history.into()))
}

/// List the authenticated user's conversations
pub async fn list_user_chats(
    AuthUser(principal): AuthUser,
    State(state): State<ChatState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ChatSummaryResponse>>> {
    let summaries = state
        .service
        .list_for_user(&principal, UserRef::from_uuid(user_id))
        .await?;

    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// List a band's conversations (band members only)
pub async fn list_band_chats(
    AuthUser(principal): AuthUser,
    State(state): State<ChatState>,
    Path(band_id): Path<Uuid>,
) -> Result<Json<Vec<ChatSummaryResponse>>> {
    let summaries = state
        .service
        .list_for_band(&principal, BandRef::from_uuid(band_id))
        .await?;

    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// Delete a conversation and its messages (internal, administrative)
pub async fn delete_chat(
    State(state): State<ChatState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let removed = state.store.delete(ConversationId::from_uuid(id)).await?;
    if !removed {
        return Err(Error::NotFound("Conversation not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
