//! Ping mode requirements (CIBA Sections 7.1 and 10.2).

use async_trait::async_trait;
use op_model::BackchannelTokenDeliveryMode;

use super::BackChannelRequestValidator;
use super::context::ValidationContext;
use crate::error::{OidcError, OidcResult};

/// Requires a notification token and endpoint from ping-mode clients.
///
/// The token is checked first.
#[derive(Debug, Clone, Copy, Default)]
pub struct PingModeValidator;

#[async_trait]
impl BackChannelRequestValidator for PingModeValidator {
    fn id(&self) -> &'static str {
        "ping-mode"
    }

    async fn validate(&self, context: &mut ValidationContext) -> OidcResult<()> {
        let client = context.client()?;
        if client.backchannel_token_delivery_mode != Some(BackchannelTokenDeliveryMode::Ping) {
            return Ok(());
        }

        let token = context.request().client_notification_token.as_deref();
        if token.is_none_or(str::is_empty) {
            return Err(OidcError::InvalidRequest(
                "client_notification_token is required in ping mode".to_string(),
            ));
        }

        if client.backchannel_client_notification_endpoint.is_none() {
            tracing::warn!(client_id = %client.client_id, "ping mode client has no notification endpoint");
            return Err(OidcError::InvalidClient(
                "client has no backchannel notification endpoint".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use op_model::ClientInfo;
    use url::Url;

    use crate::ciba::BackChannelAuthenticationRequest;
    use crate::testing::ciba_context_for;

    fn endpoint() -> Option<Url> {
        Some(Url::parse("https://client.example.com/cb").unwrap())
    }

    async fn run(
        mode: BackchannelTokenDeliveryMode,
        endpoint: Option<Url>,
        token: Option<&str>,
    ) -> OidcResult<()> {
        let mut request = BackChannelAuthenticationRequest::new();
        request.client_notification_token = token.map(str::to_string);
        let mut context = ciba_context_for(request);
        context.client_info = Some(ClientInfo::new("app").with_backchannel_delivery(mode, endpoint));
        PingModeValidator.validate(&mut context).await
    }

    #[tokio::test]
    async fn poll_and_push_are_not_checked() {
        assert!(run(BackchannelTokenDeliveryMode::Poll, None, None).await.is_ok());
        assert!(run(BackchannelTokenDeliveryMode::Push, None, None).await.is_ok());
    }

    #[tokio::test]
    async fn ping_requires_token_then_endpoint() {
        let ping = BackchannelTokenDeliveryMode::Ping;

        assert!(run(ping, endpoint(), Some("t")).await.is_ok());
        assert_eq!(
            run(ping, None, Some("t")).await.unwrap_err().error_code(),
            "invalid_client"
        );
        assert_eq!(
            run(ping, endpoint(), None).await.unwrap_err().error_code(),
            "invalid_request"
        );
        assert_eq!(
            run(ping, endpoint(), Some("")).await.unwrap_err().error_code(),
            "invalid_request"
        );
        assert_eq!(
            run(ping, None, None).await.unwrap_err().error_code(),
            "invalid_request"
        );
    }
}
