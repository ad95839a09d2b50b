//! The connection directory: an external collaborator that owns the
//! user's provider connections and announces changes to them.

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::DirectoryError;
use crate::types::{Connection, ConnectionEvent};

#[async_trait]
pub trait ConnectionDirectory: Send + Sync {
    /// The user's currently active connections.
    async fn list_active_connections(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Connection>, DirectoryError>;

    /// Subscribe to connection change notifications
    /// (added/removed/deactivated).
    fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent>;
}
