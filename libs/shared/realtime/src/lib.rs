use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

pub type PushSender = mpsc::Sender<String>;
pub type PushReceiver = mpsc::Receiver<String>;

/// Outcome of a push attempt. Callers may log it but must never fail on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    NotConnected,
    Dropped,
}

#[derive(Default)]
struct Connections {
    active: HashMap<Uuid, PushSender>,
    by_user: HashMap<String, Uuid>,
}

/// Maps users to their live push channel.
///
/// Both maps sit behind one mutex so they are always updated together. Sends are
/// `try_send` into a bounded per-connection buffer; the socket write happens in the
/// connection's own task, so a stalled client can only lose its own notifications.
#[derive(Clone)]
pub struct ConnectionRegistry {
    connections: Arc<Mutex<Connections>>,
    buffer: usize,
}

impl ConnectionRegistry {
    pub fn new(buffer: usize) -> Self {
        Self {
            connections: Arc::new(Mutex::new(Connections::default())),
            buffer: buffer.max(1),
        }
    }

    /// Records a new connection for `user_id`. A previous connection for the same user
    /// stays open but no longer receives notifications.
    pub async fn register(&self, user_id: &str) -> (Uuid, PushReceiver) {
        let (sender, receiver) = mpsc::channel(self.buffer);
        let connection_id = Uuid::new_v4();

        let mut connections = self.connections.lock().await;
        connections.active.insert(connection_id, sender);
        if let Some(previous) = connections.by_user.insert(user_id.to_string(), connection_id) {
            debug!("User {} replaced push connection {} with {}", user_id, previous, connection_id);
        }

        debug!("Registered push connection {} for user {}", connection_id, user_id);
        (connection_id, receiver)
    }

    pub async fn unregister(&self, connection_id: Uuid, user_id: &str) {
        let mut connections = self.connections.lock().await;
        connections.active.remove(&connection_id);

        // A newer connection for the same user keeps its mapping.
        if connections.by_user.get(user_id) == Some(&connection_id) {
            connections.by_user.remove(user_id);
        }

        debug!("Unregistered push connection {} for user {}", connection_id, user_id);
    }

    pub async fn notify(&self, user_id: &str, payload: &Value) -> Delivery {
        let connections = self.connections.lock().await;

        let Some(sender) = connections
            .by_user
            .get(user_id)
            .and_then(|connection_id| connections.active.get(connection_id))
        else {
            debug!("User {} has no push connection, dropping notification", user_id);
            return Delivery::NotConnected;
        };

        match sender.try_send(payload.to_string()) {
            Ok(()) => Delivery::Sent,
            Err(e) => {
                warn!("Dropped push notification for user {}: {}", user_id, e);
                Delivery::Dropped
            }
        }
    }

    pub async fn connection_for(&self, user_id: &str) -> Option<Uuid> {
        let connections = self.connections.lock().await;
        connections.by_user.get(user_id).copied()
    }

    pub async fn active_connections(&self) -> usize {
        self.connections.lock().await.active.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(32)
    }
}
