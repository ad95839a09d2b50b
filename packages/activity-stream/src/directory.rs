//! Connection directory implementations.
//!
//! The directory is an external collaborator; the engine only consumes
//! the [`ConnectionDirectory`] trait. `InMemoryDirectory` backs tests
//! and small single-process deployments seeded from configuration.

use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::DirectoryError;
use crate::traits::directory::ConnectionDirectory;
use crate::types::{Connection, ConnectionEvent};

const EVENT_CAPACITY: usize = 256;

pub struct InMemoryDirectory {
    connections: RwLock<Vec<Connection>>,
    events: broadcast::Sender<ConnectionEvent>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            connections: RwLock::new(Vec::new()),
            events,
        }
    }

    pub fn with_connections(connections: Vec<Connection>) -> Self {
        let directory = Self::new();
        *directory.connections.write().unwrap() = connections;
        directory
    }

    /// Every user id present in the directory, active or not.
    pub fn user_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .connections
            .read()
            .unwrap()
            .iter()
            .map(|c| c.user_id)
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Add or replace a connection and notify subscribers.
    pub fn upsert(&self, connection: Connection) {
        let event = {
            let mut connections = self.connections.write().unwrap();
            match connections.iter_mut().find(|c| c.id == connection.id) {
                Some(existing) => {
                    let was_active = existing.is_active;
                    *existing = connection.clone();
                    if was_active && !connection.is_active {
                        ConnectionEvent::Deactivated(connection)
                    } else {
                        ConnectionEvent::Added(connection)
                    }
                }
                None => {
                    connections.push(connection.clone());
                    ConnectionEvent::Added(connection)
                }
            }
        };
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Remove a connection outright and notify subscribers.
    pub fn remove(&self, connection_id: Uuid) {
        let removed = {
            let mut connections = self.connections.write().unwrap();
            connections
                .iter()
                .position(|c| c.id == connection_id)
                .map(|idx| connections.remove(idx))
        };
        if let Some(connection) = removed {
            let _ = self.events.send(ConnectionEvent::Removed(connection));
        }
    }
}

#[async_trait]
impl ConnectionDirectory for InMemoryDirectory {
    async fn list_active_connections(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Connection>, DirectoryError> {
        Ok(self
            .connections
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && c.is_active)
            .cloned()
            .collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.events.subscribe()
    }
}
