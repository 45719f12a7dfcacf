//! Process-local presence map
//!
//! Maps a participant id to the sender half of its active socket. One
//! connection per participant: a second join overwrites the first. Lost on
//! restart by design; see the module docs on scaling limits.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::gateway::OutboundEvent;

#[derive(Debug, Clone)]
struct Connection {
    connection_id: Uuid,
    sender: mpsc::UnboundedSender<OutboundEvent>,
}

/// Registry of which participant is reachable on which live connection
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    connections: Arc<RwLock<HashMap<Uuid, Connection>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) the connection for a participant
    pub async fn join(
        &self,
        participant_id: Uuid,
        connection_id: Uuid,
        sender: mpsc::UnboundedSender<OutboundEvent>,
    ) {
        self.connections.write().await.insert(
            participant_id,
            Connection {
                connection_id,
                sender,
            },
        );
    }

    /// Drop whichever entry belongs to the disconnecting connection.
    ///
    /// Linear scan; the socket task only knows its own connection id.
    pub async fn disconnect(&self, connection_id: Uuid) {
        self.connections
            .write()
            .await
            .retain(|_, connection| connection.connection_id != connection_id);
    }

    /// Push an event to the participant's connection if one is registered.
    ///
    /// Returns `true` when the event was handed to a live connection.
    pub async fn push(&self, participant_id: Uuid, event: OutboundEvent) -> bool {
        match self.connections.read().await.get(&participant_id) {
            Some(connection) => connection.sender.send(event).is_ok(),
            None => false,
        }
    }

    /// Whether the participant currently has a registered connection
    pub async fn is_connected(&self, participant_id: Uuid) -> bool {
        self.connections.read().await.contains_key(&participant_id)
    }
}
