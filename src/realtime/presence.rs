use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dto::message_dto::MessageView;

/// Events pushed to connected clients, tagged by `type` on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent to every connection whenever the online set changes.
    OnlineUsers { users: Vec<String> },
    /// Sent to the recipient's connections when a message is stored.
    NewMessage { message: MessageView },
}

struct ConnectionHandle {
    conn_id: Uuid,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

/// Live WebSocket connections per user. A user may hold several connections
/// (multiple tabs); they go offline when the last one drops.
#[derive(Default)]
pub struct PresenceRegistry {
    connections: RwLock<HashMap<String, Vec<ConnectionHandle>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection for `user_id`. Returns the connection id and
    /// the receiver its socket writer task drains. Everyone is told about the
    /// new online set, including the connection just added.
    pub async fn connect(&self, user_id: &str) -> (Uuid, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn_id = Uuid::new_v4();
        {
            let mut connections = self.connections.write().await;
            connections
                .entry(user_id.to_string())
                .or_default()
                .push(ConnectionHandle { conn_id, tx });
        }
        debug!("User {} connected ({})", user_id, conn_id);
        self.broadcast_online_users().await;
        (conn_id, rx)
    }

    /// Drop one connection; the user stays online while others remain.
    pub async fn disconnect(&self, user_id: &str, conn_id: Uuid) {
        {
            let mut connections = self.connections.write().await;
            if let Some(handles) = connections.get_mut(user_id) {
                handles.retain(|h| h.conn_id != conn_id);
                if handles.is_empty() {
                    connections.remove(user_id);
                }
            }
        }
        debug!("User {} disconnected ({})", user_id, conn_id);
        self.broadcast_online_users().await;
    }

    /// User ids with at least one live connection.
    pub async fn online_users(&self) -> Vec<String> {
        let connections = self.connections.read().await;
        let mut users: Vec<String> = connections.keys().cloned().collect();
        users.sort();
        users
    }

    pub async fn is_online(&self, user_id: &str) -> bool {
        self.connections.read().await.contains_key(user_id)
    }

    /// Deliver an event to every connection of `user_id`. Offline users are a
    /// no-op; history is served over HTTP. Returns how many connections the
    /// event was queued on.
    pub async fn send_to(&self, user_id: &str, event: ServerEvent) -> usize {
        let connections = self.connections.read().await;
        let Some(handles) = connections.get(user_id) else {
            debug!("No live connections for user {}, skipping push", user_id);
            return 0;
        };
        let mut delivered = 0;
        for handle in handles {
            // A closed channel just means the socket is going away.
            if handle.tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                warn!("Dropped event for closed connection {} of {}", handle.conn_id, user_id);
            }
        }
        delivered
    }

    async fn broadcast_online_users(&self) {
        let users = self.online_users().await;
        let event = ServerEvent::OnlineUsers { users };
        let connections = self.connections.read().await;
        for handles in connections.values() {
            for handle in handles {
                let _ = handle.tx.send(event.clone());
            }
        }
    }
}
