//! The `user_code` parameter (CIBA Section 7.1).

use std::sync::Arc;

use async_trait::async_trait;
use op_core::ProviderConfig;

use super::BackChannelRequestValidator;
use super::context::ValidationContext;
use crate::error::{OidcError, OidcResult};

/// Requires `user_code` when both the provider supports it and the client
/// is registered to send it. The value is not inspected.
#[derive(Debug, Clone)]
pub struct UserCodeValidator {
    config: Arc<ProviderConfig>,
}

impl UserCodeValidator {
    /// Creates the validator.
    #[must_use]
    pub const fn new(config: Arc<ProviderConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BackChannelRequestValidator for UserCodeValidator {
    fn id(&self) -> &'static str {
        "user-code"
    }

    async fn validate(&self, context: &mut ValidationContext) -> OidcResult<()> {
        let client = context.client()?;
        let required =
            self.config.backchannel_user_code_parameter_supported && client.backchannel_user_code_parameter;
        if !required {
            return Ok(());
        }

        match context.request().user_code.as_deref() {
            Some(code) if !code.is_empty() => Ok(()),
            _ => Err(OidcError::MissingUserCode("user_code is required".to_string())),
        }
    }
}
