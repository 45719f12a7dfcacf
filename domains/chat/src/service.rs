//! Conversation service: authorization and orchestration over the store
//!
//! Every operation takes the authenticated principal first and decides
//! ownership before touching conversation data. The user side authorizes by
//! direct id match; the band side authorizes through the band directory's
//! membership roster.

use std::sync::Arc;

use stagelink_auth::AuthPrincipal;
use stagelink_bands::BandDirectory;
use stagelink_common::Result;
use uuid::Uuid;

use crate::domain::entities::Conversation;
use crate::domain::error::ChatError;
use crate::domain::ids::{BandRef, ConversationId, UserRef};
use crate::domain::views::{ConversationSummary, ConversationView};
use crate::repository::ConversationStore;

/// History view plus the unread tally for the requesting principal.
///
/// The tally reflects the state at read time; viewing the history marks
/// those messages read as a side effect.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    pub view: ConversationView,
    pub unread_messages_count: usize,
}

pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
    bands: Arc<dyn BandDirectory>,
}

impl ConversationService {
    pub fn new(store: Arc<dyn ConversationStore>, bands: Arc<dyn BandDirectory>) -> Self {
        Self { store, bands }
    }

    /// Start (or return the existing) conversation between the principal
    /// and a band. The principal is always the user side.
    pub async fn start_conversation(
        &self,
        principal: &AuthPrincipal,
        band_id: BandRef,
    ) -> Result<Conversation> {
        let user_id = UserRef::from_uuid(principal.id);

        if let Some(existing) = self.store.get_by_participants(user_id, band_id).await? {
            return Ok(existing);
        }

        let conversation = Conversation::new(user_id, band_id);
        match self.store.create(&conversation).await? {
            Some(created) => {
                tracing::info!(
                    conversation_id = %created.id,
                    user_id = %user_id,
                    band_id = %band_id,
                    "conversation started"
                );
                Ok(created)
            }
            // Lost a create race; the winner's row is the conversation
            None => self
                .store
                .get_by_participants(user_id, band_id)
                .await?
                .ok_or_else(|| ChatError::UnableToCreateConversation.into()),
        }
    }

    /// Load a conversation's history view.
    ///
    /// Viewing history marks the requester's inbound messages read; the
    /// returned view and tally reflect the state before that flip.
    pub async fn get_history(
        &self,
        principal: &AuthPrincipal,
        conversation_id: ConversationId,
    ) -> Result<ChatHistory> {
        let view = self
            .store
            .get_view(conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        let reader_id = self.resolve_reader(principal, &view).await?;
        let unread_messages_count = view.unread_messages_for(reader_id);

        self.store.mark_read(conversation_id, reader_id).await?;

        Ok(ChatHistory {
            view,
            unread_messages_count,
        })
    }

    /// List the principal's own conversations. No delegation: the
    /// requested user id must be the principal's id exactly.
    pub async fn list_for_user(
        &self,
        principal: &AuthPrincipal,
        user_id: UserRef,
    ) -> Result<Vec<ConversationSummary>> {
        if principal.id != user_id.as_uuid() {
            return Err(ChatError::NotOwnerOfRequestedConversation.into());
        }
        self.store.list_for_user(user_id).await
    }

    /// List a band's conversations; requires membership in that band
    pub async fn list_for_band(
        &self,
        principal: &AuthPrincipal,
        band_id: BandRef,
    ) -> Result<Vec<ConversationSummary>> {
        if !self.is_band_member(band_id, principal.id).await? {
            return Err(ChatError::NotOwnerOfRequestedConversation.into());
        }
        self.store.list_for_band(band_id).await
    }

    /// Which side of the conversation is asking: the user directly, or a
    /// member reading on behalf of the band.
    async fn resolve_reader(
        &self,
        principal: &AuthPrincipal,
        view: &ConversationView,
    ) -> Result<Uuid> {
        if principal.id == view.user.id {
            return Ok(view.user.id);
        }

        if self
            .is_band_member(BandRef::from_uuid(view.band.id), principal.id)
            .await?
        {
            return Ok(view.band.id);
        }

        Err(ChatError::NotOwnerOfRequestedConversation.into())
    }

    async fn is_band_member(&self, band_id: BandRef, principal_id: Uuid) -> Result<bool> {
        Ok(self
            .bands
            .get_band_members(band_id.as_uuid())
            .await?
            .map(|roster| roster.contains(principal_id))
            .unwrap_or(false))
    }
}
