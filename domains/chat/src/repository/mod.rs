//! Persistence contract and implementations for the chat domain

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use stagelink_common::Result;
use uuid::Uuid;

use crate::domain::entities::{Conversation, Message};
use crate::domain::ids::{BandRef, ConversationId, UserRef};
use crate::domain::views::{ConversationSummary, ConversationView};

pub use memory::InMemoryConversationStore;
pub use postgres::PgConversationStore;

/// Durable storage contract for conversations and their messages.
///
/// Absence is an expected outcome on this contract, never an error:
/// operations that can hit a uniqueness or foreign-key constraint return
/// `None`/`false` instead of raising, so callers make the create-vs-reuse
/// decision explicitly.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a new conversation header (no messages).
    ///
    /// Returns `None` when a conversation for the same (user, band) pair
    /// already exists.
    async fn create(&self, conversation: &Conversation) -> Result<Option<Conversation>>;

    /// Persist a message under a conversation.
    ///
    /// `mark_read_on_arrival` stores the message already flagged read;
    /// used when the appended message should not count against the
    /// recipient's unread tally. Returns `None` when the conversation
    /// does not exist.
    async fn append_message(
        &self,
        conversation_id: ConversationId,
        message: &Message,
        mark_read_on_arrival: bool,
    ) -> Result<Option<Message>>;

    /// Flip `is_read` on every message addressed to `reader_id` within the
    /// conversation. Idempotent.
    async fn mark_read(&self, conversation_id: ConversationId, reader_id: Uuid) -> Result<()>;

    /// Full reconstruction including messages in ascending timestamp order
    async fn get_by_id(&self, id: ConversationId) -> Result<Option<Conversation>>;

    /// Read projection with participant summaries; `None` if absent
    async fn get_view(&self, id: ConversationId) -> Result<Option<ConversationView>>;

    /// At most one conversation exists per (user, band) pair
    async fn get_by_participants(
        &self,
        user_id: UserRef,
        band_id: BandRef,
    ) -> Result<Option<Conversation>>;

    /// Conversations where the user participates, most recent first
    async fn list_for_user(&self, user_id: UserRef) -> Result<Vec<ConversationSummary>>;

    /// Conversations where the band participates, most recent first
    async fn list_for_band(&self, band_id: BandRef) -> Result<Vec<ConversationSummary>>;

    /// Remove a conversation and all of its messages. Administrative only.
    ///
    /// Returns `true` if a row was removed.
    async fn delete(&self, id: ConversationId) -> Result<bool>;
}
