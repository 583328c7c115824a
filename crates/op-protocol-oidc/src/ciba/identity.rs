//! End-user identity hints (CIBA Section 7.1).
//!
//! Exactly one of `login_hint_token`, `id_token_hint` and `login_hint`
//! must be sent.

use std::sync::Arc;

use async_trait::async_trait;
use op_model::ClientInfo;

use super::BackChannelRequestValidator;
use super::context::{LoginHintToken, ValidationContext};
use crate::claims::JwtClaims;
use crate::error::{OidcError, OidcResult};
use crate::jwt::{JwtError, JwtExpectations, JwtValidator};
use crate::services::ProviderServices;

/// Checks the identity hint and validates signed hints.
pub struct UserIdentityValidator {
    services: ProviderServices,
    jwt_validator: Arc<JwtValidator>,
}

impl UserIdentityValidator {
    /// Creates the validator.
    #[must_use]
    pub fn new(services: ProviderServices, jwt_validator: Arc<JwtValidator>) -> Self {
        Self {
            services,
            jwt_validator,
        }
    }

    /// Validates a `login_hint_token` the client signed.
    async fn verify_login_hint_token(&self, client: &ClientInfo, token: &str) -> OidcResult<JwtClaims> {
        let expectations = JwtExpectations::new().issuer(&client.client_id);
        let keys = self.services.client_keys.signing_keys(client);
        let result = self.jwt_validator.verify(token, keys, &expectations).await;
        result
            .map(|validated| validated.claims)
            .map_err(|e| hint_error(client, "login_hint_token", e))
    }

    /// Validates an ID token this provider issued to the client. Expired
    /// tokens are acceptable hints.
    async fn verify_id_token_hint(&self, client: &ClientInfo, token: &str) -> OidcResult<JwtClaims> {
        let expectations = JwtExpectations::new()
            .issuer(&self.services.config.issuer)
            .audience(&client.client_id)
            .without_lifetime();
        let keys = self.services.service_keys.signing_keys();
        let result = self.jwt_validator.verify(token, keys, &expectations).await;
        result
            .map(|validated| validated.claims)
            .map_err(|e| hint_error(client, "id_token_hint", e))
    }
}

fn hint_error(client: &ClientInfo, hint: &str, error: JwtError) -> OidcError {
    if error.is_fault() {
        return OidcError::ServerError(error.to_string());
    }
    tracing::debug!(client_id = %client.client_id, hint, reason = %error, "identity hint rejected");
    OidcError::InvalidRequest(format!("invalid {hint}"))
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

#[async_trait]
impl BackChannelRequestValidator for UserIdentityValidator {
    fn id(&self) -> &'static str {
        "user-identity"
    }

    async fn validate(&self, context: &mut ValidationContext) -> OidcResult<()> {
        let client = context.client()?;
        let request = context.request();

        let login_hint_token = present(request.login_hint_token.as_ref());
        let id_token_hint = present(request.id_token_hint.as_ref());
        let login_hint = present(request.login_hint.as_ref());

        let hints = [login_hint_token, id_token_hint, login_hint]
            .iter()
            .flatten()
            .count();
        match hints {
            0 => {
                return Err(OidcError::InvalidRequest(
                    "identity is unknown: no login_hint_token, id_token_hint or login_hint".to_string(),
                ));
            }
            1 => {}
            _ => {
                return Err(OidcError::InvalidRequest(
                    "conflicting hints: send exactly one identity hint".to_string(),
                ));
            }
        }

        if let Some(token) = login_hint_token {
            let parsed = if client.parse_login_hint_token_as_jwt {
                LoginHintToken::Jwt(self.verify_login_hint_token(client, token).await?)
            } else {
                LoginHintToken::Opaque(token.to_string())
            };
            context.login_hint_token = Some(parsed);
        } else if let Some(token) = id_token_hint {
            let claims = self.verify_id_token_hint(client, token).await?;
            context.id_token = Some(claims);
        }

        Ok(())
    }
}

impl std::fmt::Debug for UserIdentityValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserIdentityValidator").finish_non_exhaustive()
    }
}
