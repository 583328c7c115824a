//! # op-model
//!
//! Domain models for the OpenID provider core.
//!
//! - [`client`] - registered clients, their secrets and authentication methods
//! - [`scope`] - scope definitions known to the scope registry
//! - [`resource`] - RFC 8707 resource definitions
//! - [`grant_types`] - grant type identifiers

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod grant_types;
pub mod resource;
pub mod scope;

pub use client::{
    BackchannelTokenDeliveryMode, ClientAuthMethod, ClientInfo, ClientSecret,
    TlsClientAuthSettings,
};
pub use resource::ResourceDefinition;
pub use scope::ScopeDefinition;
