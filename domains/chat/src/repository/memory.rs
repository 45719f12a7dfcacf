//! In-memory conversation store
//!
//! Backs the unit and integration test suites. Same contract semantics as
//! the Postgres store: soft-fail `None` on duplicate create, `None` on
//! append to a missing conversation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stagelink_common::Result;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Conversation, Message};
use crate::domain::ids::{BandRef, ConversationId, UserRef};
use crate::domain::views::{BandSummary, ConversationSummary, ConversationView, UserSummary};
use crate::repository::ConversationStore;

#[derive(Debug, Clone)]
struct ConversationRecord {
    id: Uuid,
    user_id: Uuid,
    band_id: Uuid,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    fn to_conversation(&self) -> Conversation {
        let mut messages = self.messages.clone();
        messages.sort_by_key(|m| m.sent_at);
        Conversation {
            id: ConversationId::from_uuid(self.id),
            user_id: UserRef::from_uuid(self.user_id),
            band_id: BandRef::from_uuid(self.band_id),
            messages,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn last_message(&self) -> Option<Message> {
        self.messages.iter().max_by_key(|m| m.sent_at).cloned()
    }
}

#[derive(Debug, Default)]
struct Inner {
    conversations: HashMap<Uuid, ConversationRecord>,
    users: HashMap<Uuid, UserSummary>,
    bands: HashMap<Uuid, BandSummary>,
}

impl Inner {
    // Unregistered participants fall back to blank summaries so reads stay total
    fn user_summary(&self, id: Uuid) -> UserSummary {
        self.users.get(&id).cloned().unwrap_or(UserSummary {
            id,
            first_name: String::new(),
            family_name: String::new(),
            image_url: None,
        })
    }

    fn band_summary(&self, id: Uuid) -> BandSummary {
        self.bands.get(&id).cloned().unwrap_or(BandSummary {
            id,
            name: String::new(),
            image_url: None,
        })
    }

    fn summary_of(&self, record: &ConversationRecord) -> ConversationSummary {
        ConversationSummary {
            id: ConversationId::from_uuid(record.id),
            user: self.user_summary(record.user_id),
            band: self.band_summary(record.band_id),
            last_message: record.last_message(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// In-memory implementation of [`ConversationStore`]
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    inner: RwLock<Inner>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user profile used by views and listings
    pub async fn register_user(&self, summary: UserSummary) {
        self.inner.write().await.users.insert(summary.id, summary);
    }

    /// Seed a band profile used by views and listings
    pub async fn register_band(&self, summary: BandSummary) {
        self.inner.write().await.bands.insert(summary.id, summary);
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<Option<Conversation>> {
        let mut inner = self.inner.write().await;

        let duplicate = inner.conversations.values().any(|record| {
            record.user_id == conversation.user_id.as_uuid()
                && record.band_id == conversation.band_id.as_uuid()
        }) || inner
            .conversations
            .contains_key(&conversation.id.as_uuid());
        if duplicate {
            return Ok(None);
        }

        let record = ConversationRecord {
            id: conversation.id.as_uuid(),
            user_id: conversation.user_id.as_uuid(),
            band_id: conversation.band_id.as_uuid(),
            messages: Vec::new(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        };
        let created = record.to_conversation();
        inner.conversations.insert(record.id, record);

        Ok(Some(created))
    }

    async fn append_message(
        &self,
        conversation_id: ConversationId,
        message: &Message,
        mark_read_on_arrival: bool,
    ) -> Result<Option<Message>> {
        let mut inner = self.inner.write().await;

        let Some(record) = inner.conversations.get_mut(&conversation_id.as_uuid()) else {
            return Ok(None);
        };

        let mut stored = message.clone();
        stored.is_read = stored.is_read || mark_read_on_arrival;
        record.messages.push(stored.clone());
        record.updated_at = Utc::now();

        Ok(Some(stored))
    }

    async fn mark_read(&self, conversation_id: ConversationId, reader_id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;

        if let Some(record) = inner.conversations.get_mut(&conversation_id.as_uuid()) {
            for message in record
                .messages
                .iter_mut()
                .filter(|m| m.recipient_id == reader_id)
            {
                message.is_read = true;
            }
        }

        Ok(())
    }

    async fn get_by_id(&self, id: ConversationId) -> Result<Option<Conversation>> {
        let inner = self.inner.read().await;
        Ok(inner
            .conversations
            .get(&id.as_uuid())
            .map(ConversationRecord::to_conversation))
    }

    async fn get_view(&self, id: ConversationId) -> Result<Option<ConversationView>> {
        let inner = self.inner.read().await;

        let Some(record) = inner.conversations.get(&id.as_uuid()) else {
            return Ok(None);
        };

        let conversation = record.to_conversation();
        Ok(Some(ConversationView {
            id: conversation.id,
            user: inner.user_summary(record.user_id),
            band: inner.band_summary(record.band_id),
            messages: conversation.messages,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }))
    }

    async fn get_by_participants(
        &self,
        user_id: UserRef,
        band_id: BandRef,
    ) -> Result<Option<Conversation>> {
        let inner = self.inner.read().await;
        Ok(inner
            .conversations
            .values()
            .find(|record| {
                record.user_id == user_id.as_uuid() && record.band_id == band_id.as_uuid()
            })
            .map(ConversationRecord::to_conversation))
    }

    async fn list_for_user(&self, user_id: UserRef) -> Result<Vec<ConversationSummary>> {
        let inner = self.inner.read().await;
        let mut summaries: Vec<ConversationSummary> = inner
            .conversations
            .values()
            .filter(|record| record.user_id == user_id.as_uuid())
            .map(|record| inner.summary_of(record))
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn list_for_band(&self, band_id: BandRef) -> Result<Vec<ConversationSummary>> {
        let inner = self.inner.read().await;
        let mut summaries: Vec<ConversationSummary> = inner
            .conversations
            .values()
            .filter(|record| record.band_id == band_id.as_uuid())
            .map(|record| inner.summary_of(record))
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn delete(&self, id: ConversationId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.conversations.remove(&id.as_uuid()).is_some())
    }
}
