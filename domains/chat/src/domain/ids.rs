//! Identifier value objects for the chat domain
//!
//! UUID newtypes prevent accidental mixing of conversation, message, user,
//! and band identifiers. The canonical textual form is a UUID; parsing any
//! other input fails with [`ChatError::InvalidIdFormat`]. The wire and
//! storage representation stays a plain uuid column.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::error::ChatError;

fn parse_uuid(value: &str) -> Result<Uuid, ChatError> {
    Uuid::parse_str(value).map_err(|_| ChatError::InvalidIdFormat(value.to_string()))
}

/// Unique identifier of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from the canonical textual form
    pub fn parse(value: &str) -> Result<Self, ChatError> {
        parse_uuid(value).map(Self)
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, ChatError> {
        parse_uuid(value).map(Self)
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reference to the user side of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRef(Uuid);

impl UserRef {
    pub fn parse(value: &str) -> Result<Self, ChatError> {
        parse_uuid(value).map(Self)
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reference to the band side of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandRef(Uuid);

impl BandRef {
    pub fn parse(value: &str) -> Result<Self, ChatError> {
        parse_uuid(value).map(Self)
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for BandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Either side of a conversation.
///
/// Matching on this is exhaustive; the storage form is two plain uuid
/// columns, so conversion back to a ref only exists relative to a
/// conversation's own pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRef {
    User(UserRef),
    Band(BandRef),
}

impl ParticipantRef {
    pub const fn as_uuid(&self) -> Uuid {
        match self {
            ParticipantRef::User(user) => user.as_uuid(),
            ParticipantRef::Band(band) => band.as_uuid(),
        }
    }
}
