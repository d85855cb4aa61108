//! Registry of live connections.

use std::collections::HashMap;

use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::ConnectionId};

/// Outbound queue of one connection (serialized text frames).
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Handle to one live client channel.
///
/// The transport owns the receiving half of the channel; dropping it marks
/// the handle closed.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: PusherChannel,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sender: PusherChannel) -> Self {
        Self { id, sender }
    }

    /// Wrap a freshly opened channel under a new identity.
    pub fn open(sender: PusherChannel) -> Self {
        Self::new(ConnectionId::generate(), sender)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Enqueue a frame without blocking.
    pub fn send(&self, content: &str) -> Result<(), MessagePushError> {
        self.sender
            .send(content.to_string())
            .map_err(|_| MessagePushError::ConnectionClosed(self.id.to_string()))
    }
}

/// Set of connections currently believed open. Each appears at most once.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection. Returns `false` (and keeps the existing handle) if it was already present.
    pub fn register(&mut self, connection: ConnectionHandle) -> bool {
        let mut inserted = false;
        self.connections.entry(connection.id()).or_insert_with(|| {
            inserted = true;
            connection
        });
        inserted
    }

    /// Remove a connection. Removing an absent connection is a no-op returning `None`.
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.connections.remove(id)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&ConnectionHandle> {
        self.connections.get(id)
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }

    /// Apply `f` to every registered connection, in unspecified order.
    ///
    /// Takes `&self`, so no registration change can interleave with the walk.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&ConnectionHandle),
    {
        self.connections.values().for_each(f);
    }
}
