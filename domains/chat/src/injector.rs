//! Booking-event injector
//!
//! Reacts to booking lifecycle notifications from the booking side of the
//! marketplace by appending a structured booking-event message to the
//! conversation between the affected user and band, creating the
//! conversation lazily when none exists yet. Write-only and fire-and-forget:
//! it never returns a view, and no retry happens here.

use std::sync::Arc;

use stagelink_common::Result;
use uuid::Uuid;

use crate::domain::entities::{Conversation, Message};
use crate::domain::error::ChatError;
use crate::domain::ids::{BandRef, MessageId, UserRef};
use crate::gateway::LiveDeliveryGateway;
use crate::repository::ConversationStore;

/// A booking changed state between this user and band
#[derive(Debug, Clone, Copy)]
pub struct BookingNotification {
    pub user_id: UserRef,
    pub band_id: BandRef,
    pub booking_id: Uuid,
}

pub struct BookingEventInjector {
    store: Arc<dyn ConversationStore>,
    gateway: Arc<LiveDeliveryGateway>,
}

impl BookingEventInjector {
    pub fn new(store: Arc<dyn ConversationStore>, gateway: Arc<LiveDeliveryGateway>) -> Self {
        Self { store, gateway }
    }

    /// Inject a booking-event message for the notified (user, band, booking).
    ///
    /// Fails with `UnableToCreateConversation` only when the lazy create
    /// attempt itself fails at the store; the caller decides whether to
    /// retry the whole notification.
    pub async fn handle(&self, notification: BookingNotification) -> Result<()> {
        let BookingNotification {
            user_id,
            band_id,
            booking_id,
        } = notification;

        // Sender is attributed to the user side regardless of which party
        // triggered the transition; see DESIGN.md.
        let message = Message::booking_event(
            MessageId::new(),
            user_id.as_uuid(),
            band_id.as_uuid(),
            booking_id,
        );

        let conversation = match self.store.get_by_participants(user_id, band_id).await? {
            Some(conversation) => conversation,
            None => {
                let conversation = Conversation::new(user_id, band_id);
                self.store
                    .create(&conversation)
                    .await?
                    .ok_or(ChatError::UnableToCreateConversation)?
            }
        };

        let stored = self
            .store
            .append_message(conversation.id, &message, false)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        tracing::info!(
            conversation_id = %conversation.id,
            booking_id = %booking_id,
            "booking event injected into conversation"
        );

        self.gateway.deliver(conversation.id, &stored).await;

        Ok(())
    }
}
