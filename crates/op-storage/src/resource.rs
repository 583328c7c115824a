//! Resource registry (RFC 8707).

use std::collections::HashMap;

use async_trait::async_trait;
use op_model::ResourceDefinition;
use tokio::sync::RwLock;

use crate::error::StorageResult;

/// Registry of protected resources.
#[async_trait]
pub trait ResourceManager: Send + Sync {
    /// Finds a resource by its URI (exact match).
    async fn find_resource(&self, resource: &str) -> StorageResult<Option<ResourceDefinition>>;
}

/// In-memory resource registry.
#[derive(Debug, Default)]
pub struct InMemoryResourceManager {
    resources: RwLock<HashMap<String, ResourceDefinition>>,
}

impl InMemoryResourceManager {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource while building the registry.
    #[must_use]
    pub fn with_resource(mut self, resource: ResourceDefinition) -> Self {
        self.resources
            .get_mut()
            .insert(resource.resource.clone(), resource);
        self
    }

    /// Inserts or replaces a resource.
    pub async fn insert(&self, resource: ResourceDefinition) {
        self.resources
            .write()
            .await
            .insert(resource.resource.clone(), resource);
    }
}

#[async_trait]
impl ResourceManager for InMemoryResourceManager {
    async fn find_resource(&self, resource: &str) -> StorageResult<Option<ResourceDefinition>> {
        Ok(self.resources.read().await.get(resource).cloned())
    }
}
