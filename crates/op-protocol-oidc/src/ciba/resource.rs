//! Resource indicators (RFC 8707 Section 2).

use std::sync::Arc;

use async_trait::async_trait;
use op_storage::ResourceManager;
use url::Url;

use super::BackChannelRequestValidator;
use super::context::ValidationContext;
use crate::error::{OidcError, OidcResult};

/// Resolves requested resources.
///
/// Each resource must be an absolute URI without a fragment and known to
/// the resource registry. Validation stops at the first bad resource. Each
/// resolved resource keeps only the scopes that were also requested.
///
/// Must run before [`ScopeValidator`](super::ScopeValidator), which
/// accepts scopes declared by the resolved resources.
pub struct ResourceValidator {
    resources: Arc<dyn ResourceManager>,
}

impl ResourceValidator {
    /// Creates a validator over a resource registry.
    #[must_use]
    pub fn new(resources: Arc<dyn ResourceManager>) -> Self {
        Self { resources }
    }
}

#[async_trait]
impl BackChannelRequestValidator for ResourceValidator {
    fn id(&self) -> &'static str {
        "resource"
    }

    async fn validate(&self, context: &mut ValidationContext) -> OidcResult<()> {
        let request = context.request();
        let mut resolved = Vec::with_capacity(request.resources.len());

        for resource in &request.resources {
            match Url::parse(resource) {
                Ok(url) if url.fragment().is_none() => {}
                Ok(_) => {
                    return Err(OidcError::InvalidTarget(format!(
                        "resource must not contain a fragment: {resource}"
                    )));
                }
                Err(_) => {
                    return Err(OidcError::InvalidTarget(format!(
                        "resource must be an absolute URI: {resource}"
                    )));
                }
            }

            let Some(definition) = self.resources.find_resource(resource).await? else {
                tracing::debug!(resource, "unknown resource");
                return Err(OidcError::InvalidTarget(format!("unknown resource: {resource}")));
            };
            resolved.push(definition.restricted_to(&request.scope));
        }

        context.resources = resolved;
        Ok(())
    }
}

impl std::fmt::Debug for ResourceValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceValidator").finish_non_exhaustive()
    }
}
