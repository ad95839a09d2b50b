use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Provider;

/// An external account/provider pairing.
///
/// Owned by the connection directory (the broker), not by this engine;
/// stream connections hold only its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: Provider,
    /// Provider-native account identifier.
    pub external_account_id: String,
    pub username: String,
    /// Access token, already scoped to this account.
    pub token: String,
    pub is_active: bool,
}

/// Change notification emitted by the connection directory.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    Added(Connection),
    Removed(Connection),
    Deactivated(Connection),
}

impl ConnectionEvent {
    pub fn connection(&self) -> &Connection {
        match self {
            ConnectionEvent::Added(c)
            | ConnectionEvent::Removed(c)
            | ConnectionEvent::Deactivated(c) => c,
        }
    }
}
