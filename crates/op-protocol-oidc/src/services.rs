//! Collaborators shared by the client authenticators and CIBA validators.

use std::sync::Arc;

use op_cache::{InMemoryTokenRegistry, TokenRegistry};
use op_core::{Clock, ProviderConfig, SystemClock};
use op_storage::{
    ClientInfoProvider, ClientKeysProvider, InMemoryClientStore, InMemoryResourceManager,
    InMemoryScopeManager, RegisteredClientKeysProvider, ResourceManager, ScopeManager,
    ServiceKeysProvider, StaticServiceKeys,
};

use crate::jwt::JwtValidator;

/// Everything the core looks up or consults while handling a request.
#[derive(Clone)]
pub struct ProviderServices {
    /// Provider configuration.
    pub config: Arc<ProviderConfig>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Registered clients.
    pub clients: Arc<dyn ClientInfoProvider>,
    /// Registered client keys.
    pub client_keys: Arc<dyn ClientKeysProvider>,
    /// The provider's own keys.
    pub service_keys: Arc<dyn ServiceKeysProvider>,
    /// Scope registry.
    pub scopes: Arc<dyn ScopeManager>,
    /// Resource registry.
    pub resources: Arc<dyn ResourceManager>,
    /// Replay registry.
    pub token_registry: Arc<dyn TokenRegistry>,
}

impl ProviderServices {
    /// Creates services over the given client store, with in-memory
    /// defaults for everything else.
    #[must_use]
    pub fn new(config: ProviderConfig, clients: Arc<dyn ClientInfoProvider>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            config: Arc::new(config),
            token_registry: Arc::new(InMemoryTokenRegistry::with_clock(clock.clone())),
            clock,
            clients,
            client_keys: Arc::new(RegisteredClientKeysProvider),
            service_keys: Arc::new(StaticServiceKeys::default()),
            scopes: Arc::new(InMemoryScopeManager::new()),
            resources: Arc::new(InMemoryResourceManager::new()),
        }
    }

    /// Creates services with an empty in-memory client store.
    #[must_use]
    pub fn in_memory(config: ProviderConfig) -> Self {
        Self::new(config, Arc::new(InMemoryClientStore::new()))
    }

    /// Replaces the clock. The replay registry is rebuilt on it.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.token_registry = Arc::new(InMemoryTokenRegistry::with_clock(clock.clone()));
        self.clock = clock;
        self
    }

    /// Replaces the client key provider.
    #[must_use]
    pub fn with_client_keys(mut self, client_keys: Arc<dyn ClientKeysProvider>) -> Self {
        self.client_keys = client_keys;
        self
    }

    /// Replaces the provider key source.
    #[must_use]
    pub fn with_service_keys(mut self, service_keys: Arc<dyn ServiceKeysProvider>) -> Self {
        self.service_keys = service_keys;
        self
    }

    /// Replaces the scope registry.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Arc<dyn ScopeManager>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Replaces the resource registry.
    #[must_use]
    pub fn with_resources(mut self, resources: Arc<dyn ResourceManager>) -> Self {
        self.resources = resources;
        self
    }

    /// Replaces the replay registry.
    #[must_use]
    pub fn with_token_registry(mut self, token_registry: Arc<dyn TokenRegistry>) -> Self {
        self.token_registry = token_registry;
        self
    }

    /// Builds a JWT validator on these services.
    #[must_use]
    pub fn jwt_validator(&self) -> JwtValidator {
        JwtValidator::new(
            self.clock.clone(),
            self.token_registry.clone(),
            self.config.clock_skew,
        )
    }
}

impl std::fmt::Debug for ProviderServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderServices")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
