//! Read projections for display
//!
//! Denormalized shapes combining conversation, message, and participant
//! summary data. Computed on read, never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Message;
use crate::domain::ids::ConversationId;

/// Display summary of the user side of a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub image_url: Option<String>,
}

/// Display summary of the band side of a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSummary {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
}

/// Full conversation history plus participant summaries.
///
/// The unread count is relative to whoever is asking, so it is exposed as
/// a computation over the message list rather than a stored field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationView {
    pub id: ConversationId,
    pub user: UserSummary,
    pub band: BandSummary,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationView {
    /// Count of messages addressed to the given participant and not yet read
    pub fn unread_messages_for(&self, participant_id: Uuid) -> usize {
        self.messages
            .iter()
            .filter(|m| m.recipient_id == participant_id && !m.is_read)
            .count()
    }
}

/// One row of a chat listing: participants plus the most recent message
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub user: UserSummary,
    pub band: BandSummary,
    pub last_message: Option<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
