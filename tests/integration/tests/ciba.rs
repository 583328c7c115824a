//! Backchannel authentication requests through the default validator chain.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use op_crypto::JsonWebKeySet;
use op_model::{
    BackchannelTokenDeliveryMode, ClientAuthMethod, ClientInfo, ResourceDefinition,
    ScopeDefinition, grant_types,
};
use op_protocol_oidc::{
    BackChannelAuthenticationRequest, BackChannelAuthenticationValidator, ClientRequest,
    JwtClaims, LoginHintToken, ProviderServices,
};
use op_storage::{
    InMemoryResourceManager, InMemoryScopeManager, ResourceManager, ScopeManager, StorageResult,
};
use url::Url;

use crate::common::{EC_KEY, assertion_claims, ec_jwk, services, sign};

const CLIENT_ID: &str = "ciba-app";
const SECRET: &str = "ciba-secret";
const API: &str = "https://api.example.com";

/// Fails the test if consulted.
struct Unreachable;

#[async_trait]
impl ScopeManager for Unreachable {
    async fn find_scope(&self, name: &str) -> StorageResult<Option<ScopeDefinition>> {
        panic!("scope registry queried for {name}");
    }
}

#[async_trait]
impl ResourceManager for Unreachable {
    async fn find_resource(&self, resource: &str) -> StorageResult<Option<ResourceDefinition>> {
        panic!("resource registry queried for {resource}");
    }
}

fn ciba_client() -> ClientInfo {
    ClientInfo::new_confidential(CLIENT_ID, ClientAuthMethod::ClientSecretBasic, SECRET)
        .with_grant_type(grant_types::CIBA)
}

fn with_registries(services: ProviderServices) -> ProviderServices {
    services
        .with_scopes(Arc::new(InMemoryScopeManager::with_names(["openid", "profile"])))
        .with_resources(Arc::new(InMemoryResourceManager::new().with_resource(
            ResourceDefinition::new(API).with_scope(ScopeDefinition::new("api:read")),
        )))
}

fn credentials() -> ClientRequest {
    ClientRequest::new().with_basic_auth(CLIENT_ID, SECRET)
}

#[tokio::test]
async fn valid_request_populates_context() -> Result<()> {
    let (_, services) = services(vec![ciba_client()]);
    let validator = BackChannelAuthenticationValidator::new(&with_registries(services));

    let request = BackChannelAuthenticationRequest::new()
        .with_scope("openid api:read")
        .with_resource(API)
        .with_login_hint("alice@example.com")
        .with_binding_message("W4SCT")
        .with_acr_values("urn:example:mfa");

    let context = validator.validate(request, credentials()).await?;

    assert_eq!(context.client()?.client_id, CLIENT_ID);
    let scopes: Vec<_> = context.scopes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(scopes, vec!["openid", "api:read"]);
    assert_eq!(context.resources.len(), 1);
    assert_eq!(context.expires_in, Some(Duration::from_secs(300)));
    assert_eq!(context.request().binding_message.as_deref(), Some("W4SCT"));
    assert_eq!(context.request().acr_values, vec!["urn:example:mfa"]);
    Ok(())
}

#[tokio::test]
async fn unauthenticated_client_stops_before_any_registry() -> Result<()> {
    let (_, services) = services(vec![ciba_client()]);
    let services = services
        .with_scopes(Arc::new(Unreachable))
        .with_resources(Arc::new(Unreachable));
    let validator = BackChannelAuthenticationValidator::new(&services);

    let request = BackChannelAuthenticationRequest::new()
        .with_scope("openid")
        .with_resource(API)
        .with_login_hint("alice");
    let err = validator
        .validate(request, ClientRequest::new().with_basic_auth(CLIENT_ID, "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "unauthorized_client");
    Ok(())
}

#[tokio::test]
async fn client_without_ciba_grant_is_unauthorized() -> Result<()> {
    let client =
        ClientInfo::new_confidential(CLIENT_ID, ClientAuthMethod::ClientSecretBasic, SECRET);
    let (_, services) = services(vec![client]);
    let validator = BackChannelAuthenticationValidator::new(&with_registries(services));

    let request = BackChannelAuthenticationRequest::new().with_login_hint("alice");
    let err = validator.validate(request, credentials()).await.unwrap_err();

    assert_eq!(err.error_code(), "unauthorized_client");
    Ok(())
}

#[tokio::test]
async fn offline_access_is_refused_without_scope_lookup() -> Result<()> {
    let (_, services) = services(vec![ciba_client()]);
    let validator = BackChannelAuthenticationValidator::new(&services.with_scopes(Arc::new(Unreachable)));

    let request = BackChannelAuthenticationRequest::new()
        .with_scope("openid offline_access")
        .with_login_hint("alice");
    let err = validator.validate(request, credentials()).await.unwrap_err();

    assert_eq!(err.error_code(), "invalid_scope");
    Ok(())
}

#[tokio::test]
async fn resource_scope_is_unknown_without_its_resource() -> Result<()> {
    let (_, services) = services(vec![ciba_client()]);
    let validator = BackChannelAuthenticationValidator::new(&with_registries(services));

    let request = BackChannelAuthenticationRequest::new()
        .with_scope("openid api:read")
        .with_login_hint("alice");
    let err = validator.validate(request, credentials()).await.unwrap_err();

    assert_eq!(err.error_code(), "invalid_scope");
    Ok(())
}

#[tokio::test]
async fn conflicting_hints_are_invalid_request() -> Result<()> {
    let (_, services) = services(vec![ciba_client()]);
    let validator = BackChannelAuthenticationValidator::new(&with_registries(services));

    let request = BackChannelAuthenticationRequest::new()
        .with_scope("openid")
        .with_login_hint("alice")
        .with_login_hint_token("opaque");
    let err = validator.validate(request, credentials()).await.unwrap_err();

    assert_eq!(err.error_code(), "invalid_request");
    Ok(())
}

#[tokio::test]
async fn signed_login_hint_token_from_private_key_jwt_client() -> Result<()> {
    let client = ClientInfo::new(CLIENT_ID)
        .with_auth_method(ClientAuthMethod::PrivateKeyJwt)
        .with_jwks(JsonWebKeySet::with_keys(vec![ec_jwk()?]))
        .with_grant_type(grant_types::CIBA)
        .with_login_hint_token_jwt();
    let (_, services) = services(vec![client]);
    let services = with_registries(services);
    let validator = BackChannelAuthenticationValidator::new(&services);

    let assertion = sign(&assertion_claims(&services, CLIENT_ID, "auth-1"), Algorithm::ES256, EC_KEY)?;
    let hint = JwtClaims::new()
        .with_issuer(CLIENT_ID)
        .with_subject("alice")
        .with_expiry(services.clock.now() + chrono::Duration::minutes(5));
    let hint = sign(&hint, Algorithm::ES256, EC_KEY)?;

    let request = BackChannelAuthenticationRequest::new()
        .with_scope("openid")
        .with_login_hint_token(hint);
    let context = validator
        .validate(request, ClientRequest::new().with_jwt_assertion(assertion))
        .await?;

    let Some(LoginHintToken::Jwt(claims)) = &context.login_hint_token else {
        panic!("expected a verified login hint token");
    };
    assert_eq!(claims.sub.as_deref(), Some("alice"));
    Ok(())
}

#[tokio::test]
async fn ping_mode_checks_token_before_endpoint() -> Result<()> {
    let client = ciba_client().with_backchannel_delivery(BackchannelTokenDeliveryMode::Ping, None);
    let (_, services) = services(vec![client]);
    let validator = BackChannelAuthenticationValidator::new(&with_registries(services));
    let base = BackChannelAuthenticationRequest::new()
        .with_scope("openid")
        .with_login_hint("alice");

    let err = validator.validate(base.clone(), credentials()).await.unwrap_err();
    assert_eq!(err.error_code(), "invalid_request");

    let err = validator
        .validate(base.with_client_notification_token("notify-me"), credentials())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "invalid_client");
    Ok(())
}

#[tokio::test]
async fn ping_mode_with_endpoint_and_token_passes() -> Result<()> {
    let endpoint = Url::parse("https://client.example.com/ciba")?;
    let client = ciba_client()
        .with_backchannel_delivery(BackchannelTokenDeliveryMode::Ping, Some(endpoint));
    let (_, services) = services(vec![client]);
    let validator = BackChannelAuthenticationValidator::new(&with_registries(services));

    let request = BackChannelAuthenticationRequest::new()
        .with_scope("openid")
        .with_login_hint("alice")
        .with_client_notification_token("notify-me");

    validator.validate(request, credentials()).await?;
    Ok(())
}

#[tokio::test]
async fn requested_expiry_is_bounded_by_maximum() -> Result<()> {
    let (_, services) = services(vec![ciba_client()]);
    let validator = BackChannelAuthenticationValidator::new(&with_registries(services));
    let base = BackChannelAuthenticationRequest::new()
        .with_scope("openid")
        .with_login_hint("alice");

    let context = validator
        .validate(base.clone().with_requested_expiry(Duration::from_secs(1_800)), credentials())
        .await?;
    assert_eq!(context.expires_in, Some(Duration::from_secs(1_800)));

    let err = validator
        .validate(base.with_requested_expiry(Duration::from_secs(1_801)), credentials())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "invalid_request");
    Ok(())
}
