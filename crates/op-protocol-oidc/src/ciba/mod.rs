//! Client-Initiated Backchannel Authentication request validation.
//!
//! A backchannel authentication request passes through an ordered list of
//! [`BackChannelRequestValidator`]s sharing one [`ValidationContext`].
//! The first error stops the chain and is returned as is.
//!
//! ## Default order
//!
//! 1. [`ClientValidator`] - authenticates the client, requires the CIBA grant
//! 2. [`ResourceValidator`] - resolves resource indicators
//! 3. [`ScopeValidator`] - resolves scopes, including resource scopes
//! 4. [`UserIdentityValidator`] - exactly one identity hint
//! 5. [`PingModeValidator`] - notification token and endpoint for ping mode
//! 6. [`UserCodeValidator`] - `user_code` when required
//! 7. [`RequestedExpiryValidator`] - request lifetime
//!
//! Every validator after the first reads the authenticated client. The
//! scope validator accepts resource scopes only when the resource
//! validator ran before it. Custom chains built with
//! [`BackChannelAuthenticationValidator::with_validators`] must keep both
//! orderings.

mod client;
mod context;
mod expiry;
mod identity;
mod ping;
mod request;
mod resource;
mod scope;
mod user_code;

use std::sync::Arc;

use async_trait::async_trait;
use op_core::{EventBuilder, EventType};

use crate::client_auth::{ClientRequest, CompositeClientAuthenticator};
use crate::error::OidcResult;
use crate::services::ProviderServices;

pub use client::ClientValidator;
pub use context::{LoginHintToken, ValidationContext};
pub use expiry::RequestedExpiryValidator;
pub use identity::UserIdentityValidator;
pub use ping::PingModeValidator;
pub use request::BackChannelAuthenticationRequest;
pub use resource::ResourceValidator;
pub use scope::{OFFLINE_ACCESS, ScopeValidator};
pub use user_code::UserCodeValidator;

/// One check applied to a backchannel authentication request.
#[async_trait]
pub trait BackChannelRequestValidator: Send + Sync {
    /// Short name used in logs.
    fn id(&self) -> &'static str;

    /// Checks the request, writing what it resolves into `context`.
    ///
    /// A validator that fails leaves `context` as it found it.
    ///
    /// # Errors
    ///
    /// Returns the OAuth error the request must be answered with.
    async fn validate(&self, context: &mut ValidationContext) -> OidcResult<()>;
}

/// Runs validators in order and stops at the first error.
pub struct BackChannelAuthenticationValidator {
    validators: Vec<Arc<dyn BackChannelRequestValidator>>,
}

impl BackChannelAuthenticationValidator {
    /// Creates the default chain over the given services.
    #[must_use]
    pub fn new(services: &ProviderServices) -> Self {
        let authenticator = Arc::new(CompositeClientAuthenticator::with_defaults(services));
        let jwt_validator = Arc::new(services.jwt_validator());
        Self::with_validators(vec![
            Arc::new(ClientValidator::new(authenticator)),
            Arc::new(ResourceValidator::new(services.resources.clone())),
            Arc::new(ScopeValidator::new(services.scopes.clone())),
            Arc::new(UserIdentityValidator::new(services.clone(), jwt_validator)),
            Arc::new(PingModeValidator),
            Arc::new(UserCodeValidator::new(services.config.clone())),
            Arc::new(RequestedExpiryValidator::new(services.config.clone())),
        ])
    }

    /// Creates a chain running `validators` in the given order.
    ///
    /// See the [module documentation](self) for the ordering the built-in
    /// validators rely on.
    #[must_use]
    pub fn with_validators(validators: Vec<Arc<dyn BackChannelRequestValidator>>) -> Self {
        Self { validators }
    }

    /// Validator names in execution order.
    #[must_use]
    pub fn validator_ids(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.id()).collect()
    }

    /// Runs the chain on an existing context.
    ///
    /// # Errors
    ///
    /// Returns the first validator error.
    pub async fn validate_context(&self, context: &mut ValidationContext) -> OidcResult<()> {
        for validator in &self.validators {
            if let Err(e) = validator.validate(context).await {
                tracing::debug!(
                    validator = validator.id(),
                    error = e.error_code(),
                    description = e.description(),
                    "backchannel authentication request rejected"
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Validates a backchannel authentication request.
    ///
    /// # Errors
    ///
    /// Returns the first validator error.
    pub async fn validate(
        &self,
        request: BackChannelAuthenticationRequest,
        client_request: ClientRequest,
    ) -> OidcResult<ValidationContext> {
        let mut context = ValidationContext::new(request, client_request);
        let result = self.validate_context(&mut context).await;

        let client_id = context
            .client_info
            .as_ref()
            .map(|c| c.client_id.as_str())
            .or_else(|| context.client_request().client_id());
        match result {
            Ok(()) => {
                EventBuilder::new(EventType::BackchannelAuthentication)
                    .success()
                    .maybe_client(client_id)
                    .emit();
                Ok(context)
            }
            Err(e) => {
                EventBuilder::new(EventType::BackchannelAuthenticationError)
                    .maybe_client(client_id)
                    .failure(e.error_code())
                    .emit();
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for BackChannelAuthenticationValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackChannelAuthenticationValidator")
            .field("validators", &self.validator_ids())
            .finish()
    }
}
