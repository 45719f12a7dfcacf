//! Domain entities for the chat subsystem
//!
//! A [`Message`] is one unit of conversation content: free text typed by a
//! participant, or a structured booking event injected when a booking
//! changes state. A [`Conversation`] is the durable thread between exactly
//! one user and one band. Both are pure values; persistence and live
//! delivery happen elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::ChatError;
use crate::domain::ids::{BandRef, ConversationId, MessageId, ParticipantRef, UserRef};

/// Structured payload of a booking-event message.
///
/// Only `booking_id` is guaranteed; the remaining fields are denormalized
/// display data filled in when the booking side supplies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub booking_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl BookingDetails {
    /// Minimal payload carrying only the booking reference
    pub fn reference(booking_id: Uuid) -> Self {
        Self {
            booking_id,
            booking_status: None,
            event_name: None,
            event_date: None,
            venue: None,
            city: None,
        }
    }
}

/// Flat record of a message as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: Option<String>,
    pub booking: Option<BookingDetails>,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

/// One unit of conversation content
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: Option<String>,
    pub booking: Option<BookingDetails>,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl Message {
    /// Create a plain text message
    pub fn text(
        id: MessageId,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: String,
    ) -> Result<Self, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::InvalidMessageContent);
        }

        Ok(Message {
            id,
            sender_id,
            recipient_id,
            content: Some(content),
            booking: None,
            sent_at: Utc::now(),
            is_read: false,
        })
    }

    /// Create a booking-event message carrying only the booking reference
    pub fn booking_event(
        id: MessageId,
        sender_id: Uuid,
        recipient_id: Uuid,
        booking_id: Uuid,
    ) -> Self {
        Message {
            id,
            sender_id,
            recipient_id,
            content: None,
            booking: Some(BookingDetails::reference(booking_id)),
            sent_at: Utc::now(),
            is_read: false,
        }
    }

    /// Reconstruct from persisted fields.
    ///
    /// The content-or-booking invariant is re-checked on every
    /// reconstruction, not just at construction.
    pub fn from_stored(stored: StoredMessage) -> Result<Self, ChatError> {
        if stored.content.is_none() && stored.booking.is_none() {
            return Err(ChatError::InvalidMessageContent);
        }

        Ok(Message {
            id: MessageId::from_uuid(stored.id),
            sender_id: stored.sender_id,
            recipient_id: stored.recipient_id,
            content: stored.content,
            booking: stored.booking,
            sent_at: stored.sent_at,
            is_read: stored.is_read,
        })
    }

    /// Flat primitive record for persistence
    pub fn to_stored(&self) -> StoredMessage {
        StoredMessage {
            id: self.id.as_uuid(),
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            content: self.content.clone(),
            booking: self.booking.clone(),
            sent_at: self.sent_at,
            is_read: self.is_read,
        }
    }

    /// True for structured booking events, false for free text
    pub fn is_booking_event(&self) -> bool {
        self.booking.is_some()
    }
}

/// Flat record of a conversation as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub band_id: Uuid,
    pub messages: Vec<StoredMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The durable thread of messages between one user and one band.
///
/// Message order is insertion order, which equals chronological order.
/// The entity itself is immutable; appending a message is a store-level
/// operation and the conversation is the aggregation root for queries only.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: ConversationId,
    pub user_id: UserRef,
    pub band_id: BandRef,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation between a user and a band
    pub fn new(user_id: UserRef, band_id: BandRef) -> Self {
        let now = Utc::now();
        Conversation {
            id: ConversationId::new(),
            user_id,
            band_id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Which side of the conversation the given id is, if either
    pub fn participant_for(&self, participant_id: Uuid) -> Option<ParticipantRef> {
        if participant_id == self.user_id.as_uuid() {
            Some(ParticipantRef::User(self.user_id))
        } else if participant_id == self.band_id.as_uuid() {
            Some(ParticipantRef::Band(self.band_id))
        } else {
            None
        }
    }

    /// True iff the given id is one of the two participants
    pub fn is_owner(&self, participant_id: Uuid) -> bool {
        self.participant_for(participant_id).is_some()
    }

    /// Reconstruct from persisted fields, re-validating contained messages
    pub fn from_stored(stored: StoredConversation) -> Result<Self, ChatError> {
        let messages = stored
            .messages
            .into_iter()
            .map(Message::from_stored)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Conversation {
            id: ConversationId::from_uuid(stored.id),
            user_id: UserRef::from_uuid(stored.user_id),
            band_id: BandRef::from_uuid(stored.band_id),
            messages,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }

    /// Flat primitive record for persistence
    pub fn to_stored(&self) -> StoredConversation {
        StoredConversation {
            id: self.id.as_uuid(),
            user_id: self.user_id.as_uuid(),
            band_id: self.band_id.as_uuid(),
            messages: self.messages.iter().map(Message::to_stored).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
