//! Chat domain error taxonomy

use stagelink_common::Error;
use thiserror::Error;

/// Errors raised by chat entities, the service, the injector, and the gateway
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChatError {
    #[error("Invalid identifier format: {0}")]
    InvalidIdFormat(String),

    #[error("A message requires text content or booking details")]
    InvalidMessageContent,

    #[error("Principal is not an owner of the requested conversation")]
    NotOwnerOfRequestedConversation,

    #[error("Message sender or recipient is not a participant of the conversation")]
    InvalidMessageActors,

    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("Unable to create conversation")]
    UnableToCreateConversation,
}

impl From<ChatError> for Error {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidIdFormat(_) | ChatError::InvalidMessageContent => {
                Error::Validation(err.to_string())
            }
            ChatError::NotOwnerOfRequestedConversation | ChatError::InvalidMessageActors => {
                Error::Authorization(err.to_string())
            }
            ChatError::ConversationNotFound => Error::NotFound(err.to_string()),
            ChatError::UnableToCreateConversation => Error::Conflict(err.to_string()),
        }
    }
}
