//! The `requested_expiry` parameter.

use std::sync::Arc;

use async_trait::async_trait;
use op_core::ProviderConfig;

use super::BackChannelRequestValidator;
use super::context::ValidationContext;
use crate::error::{OidcError, OidcResult};

/// Sets the request lifetime to the configured default when none is
/// requested. A requested lifetime is kept when it does not exceed the
/// configured maximum and rejected otherwise.
#[derive(Debug, Clone)]
pub struct RequestedExpiryValidator {
    config: Arc<ProviderConfig>,
}

impl RequestedExpiryValidator {
    /// Creates the validator.
    #[must_use]
    pub const fn new(config: Arc<ProviderConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BackChannelRequestValidator for RequestedExpiryValidator {
    fn id(&self) -> &'static str {
        "requested-expiry"
    }

    async fn validate(&self, context: &mut ValidationContext) -> OidcResult<()> {
        let expires_in = match context.request().requested_expiry {
            None => self.config.backchannel_default_expiry,
            Some(requested) if requested <= self.config.backchannel_maximum_expiry => requested,
            Some(requested) => {
                tracing::debug!(
                    requested = ?requested,
                    maximum = ?self.config.backchannel_maximum_expiry,
                    "requested expiry too long"
                );
                return Err(OidcError::InvalidRequest(format!(
                    "requested_expiry must not exceed {} seconds",
                    self.config.backchannel_maximum_expiry.as_secs()
                )));
            }
        };

        context.expires_in = Some(expires_in);
        Ok(())
    }
}
