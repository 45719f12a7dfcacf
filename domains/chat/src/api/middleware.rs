//! Chat domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use stagelink_auth::AuthBackend;
use stagelink_bands::BandDirectory;

use crate::gateway::{LiveDeliveryGateway, PresenceRegistry};
use crate::injector::BookingEventInjector;
use crate::repository::ConversationStore;
use crate::service::ConversationService;

/// Application state for the chat domain
#[derive(Clone)]
pub struct ChatState {
    pub service: Arc<ConversationService>,
    pub injector: Arc<BookingEventInjector>,
    pub gateway: Arc<LiveDeliveryGateway>,
    pub registry: PresenceRegistry,
    pub store: Arc<dyn ConversationStore>,
    pub auth: AuthBackend,
}

impl ChatState {
    /// Wire the chat domain against a store and a band directory
    pub fn new(
        store: Arc<dyn ConversationStore>,
        bands: Arc<dyn BandDirectory>,
        auth: AuthBackend,
    ) -> Self {
        let registry = PresenceRegistry::new();
        let gateway = Arc::new(LiveDeliveryGateway::new(store.clone(), registry.clone()));
        let service = Arc::new(ConversationService::new(store.clone(), bands));
        let injector = Arc::new(BookingEventInjector::new(store.clone(), gateway.clone()));

        Self {
            service,
            injector,
            gateway,
            registry,
            store,
            auth,
        }
    }
}

impl FromRef<ChatState> for AuthBackend {
    fn from_ref(state: &ChatState) -> Self {
        state.auth.clone()
    }
}
