//! Scope registry.

use std::collections::HashMap;

use async_trait::async_trait;
use op_model::ScopeDefinition;
use tokio::sync::RwLock;

use crate::error::StorageResult;

/// Registry of known scopes.
#[async_trait]
pub trait ScopeManager: Send + Sync {
    /// Finds a scope by name.
    async fn find_scope(&self, name: &str) -> StorageResult<Option<ScopeDefinition>>;
}

/// In-memory scope registry.
#[derive(Debug, Default)]
pub struct InMemoryScopeManager {
    scopes: RwLock<HashMap<String, ScopeDefinition>>,
}

impl InMemoryScopeManager {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with plain scopes of the given names.
    #[must_use]
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(Self::new(), |manager, name| {
                manager.with_scope(ScopeDefinition::new(name))
            })
    }

    /// Adds a scope while building the registry.
    #[must_use]
    pub fn with_scope(mut self, scope: ScopeDefinition) -> Self {
        self.scopes.get_mut().insert(scope.name.clone(), scope);
        self
    }

    /// Inserts or replaces a scope.
    pub async fn insert(&self, scope: ScopeDefinition) {
        self.scopes.write().await.insert(scope.name.clone(), scope);
    }
}

#[async_trait]
impl ScopeManager for InMemoryScopeManager {
    async fn find_scope(&self, name: &str) -> StorageResult<Option<ScopeDefinition>> {
        Ok(self.scopes.read().await.get(name).cloned())
    }
}
