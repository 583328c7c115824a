//! Client lookup.

use std::collections::HashMap;

use async_trait::async_trait;
use op_model::ClientInfo;
use tokio::sync::RwLock;

use crate::error::StorageResult;

/// Provider for registered clients.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait ClientInfoProvider: Send + Sync {
    /// Finds a client by `client_id`.
    ///
    /// Returns `Ok(None)` for an unknown client.
    async fn find_client(&self, client_id: &str) -> StorageResult<Option<ClientInfo>>;
}

/// In-memory client store.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    clients: RwLock<HashMap<String, ClientInfo>>,
}

impl InMemoryClientStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client while building the store.
    #[must_use]
    pub fn with_client(mut self, client: ClientInfo) -> Self {
        self.clients
            .get_mut()
            .insert(client.client_id.clone(), client);
        self
    }

    /// Inserts or replaces a client.
    pub async fn insert(&self, client: ClientInfo) {
        self.clients
            .write()
            .await
            .insert(client.client_id.clone(), client);
    }

    /// Removes a client.
    pub async fn remove(&self, client_id: &str) -> Option<ClientInfo> {
        self.clients.write().await.remove(client_id)
    }
}

#[async_trait]
impl ClientInfoProvider for InMemoryClientStore {
    async fn find_client(&self, client_id: &str) -> StorageResult<Option<ClientInfo>> {
        Ok(self.clients.read().await.get(client_id).cloned())
    }
}
