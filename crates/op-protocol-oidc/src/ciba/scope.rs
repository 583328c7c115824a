//! Requested scopes.

use std::sync::Arc;

use async_trait::async_trait;
use op_storage::ScopeManager;

use super::BackChannelRequestValidator;
use super::context::ValidationContext;
use crate::error::{OidcError, OidcResult};

/// Scope that asks for a refresh token usable without the user.
pub const OFFLINE_ACCESS: &str = "offline_access";

/// Resolves requested scopes against the scope registry and the scopes of
/// already resolved resources.
///
/// `offline_access` from a client without offline access is rejected
/// before the registry is consulted. Scopes declared only by a resource
/// are accepted once [`ResourceValidator`](super::ResourceValidator) has
/// run, so that validator must come first.
pub struct ScopeValidator {
    scopes: Arc<dyn ScopeManager>,
}

impl ScopeValidator {
    /// Creates a validator over a scope registry.
    #[must_use]
    pub fn new(scopes: Arc<dyn ScopeManager>) -> Self {
        Self { scopes }
    }
}

#[async_trait]
impl BackChannelRequestValidator for ScopeValidator {
    fn id(&self) -> &'static str {
        "scope"
    }

    async fn validate(&self, context: &mut ValidationContext) -> OidcResult<()> {
        let client = context.client()?;
        let request = context.request();

        if request.requests_scope(OFFLINE_ACCESS) && !client.offline_access_allowed {
            tracing::debug!(client_id = %client.client_id, "offline access not allowed");
            return Err(OidcError::InvalidScope(
                "client is not allowed to request offline_access".to_string(),
            ));
        }

        let mut resolved = Vec::with_capacity(request.scope.len());
        for name in &request.scope {
            if let Some(scope) = self.scopes.find_scope(name).await? {
                resolved.push(scope);
                continue;
            }
            let Some(scope) = context
                .resources
                .iter()
                .find_map(|resource| resource.find_scope(name))
            else {
                tracing::debug!(client_id = %client.client_id, scope = %name, "unknown scope");
                return Err(OidcError::InvalidScope(format!("unknown scope: {name}")));
            };
            resolved.push(scope.clone());
        }

        context.scopes = resolved;
        Ok(())
    }
}

impl std::fmt::Debug for ScopeValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeValidator").finish_non_exhaustive()
    }
}
