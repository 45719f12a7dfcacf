//! Chat domain: user/band conversations, booking-event messages, live delivery
//!
//! The durable side (conversations + messages) lives behind the
//! [`ConversationStore`] contract; the volatile side (who is reachable on
//! which socket) lives in the [`gateway`] module. [`ConversationService`]
//! mediates every read path and enforces ownership before touching the store.

pub mod api;
pub mod domain;
pub mod gateway;
pub mod injector;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{BookingDetails, Conversation, Message};
pub use domain::error::ChatError;
pub use domain::ids::{BandRef, ConversationId, MessageId, ParticipantRef, UserRef};
pub use domain::views::{BandSummary, ConversationSummary, ConversationView, UserSummary};

// Re-export repository types
pub use repository::{ConversationStore, InMemoryConversationStore, PgConversationStore};

// Re-export orchestration types
pub use gateway::{LiveDeliveryGateway, PresenceRegistry};
pub use injector::{BookingEventInjector, BookingNotification};
pub use service::{ChatHistory, ConversationService};

// Re-export API types
pub use api::routes;
pub use api::ChatState;
