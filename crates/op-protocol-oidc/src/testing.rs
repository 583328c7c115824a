//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::Utc;
use op_core::{FixedClock, ProviderConfig};
use op_model::ClientInfo;
use op_storage::InMemoryClientStore;

use crate::ciba::{BackChannelAuthenticationRequest, ValidationContext};
use crate::client_auth::ClientRequest;
use crate::services::ProviderServices;

pub(crate) const ISSUER: &str = "https://op.example.com";

/// Services over the given clients with a frozen clock.
pub(crate) fn services_with(clients: Vec<ClientInfo>) -> (Arc<FixedClock>, ProviderServices) {
    let store = clients
        .into_iter()
        .fold(InMemoryClientStore::new(), InMemoryClientStore::with_client);
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let services =
        ProviderServices::new(ProviderConfig::new(ISSUER), Arc::new(store)).with_clock(clock.clone());
    (clock, services)
}

/// A context for `request` with no client credentials.
pub(crate) fn ciba_context_for(request: BackChannelAuthenticationRequest) -> ValidationContext {
    ValidationContext::new(request, ClientRequest::new())
}

/// A context for an empty request with the given client credentials.
pub(crate) fn ciba_context(client_request: ClientRequest) -> ValidationContext {
    ValidationContext::new(BackChannelAuthenticationRequest::new(), client_request)
}
