//! # op-protocol-oidc
//!
//! Client authentication and CIBA request validation for the OpenID
//! provider core.
//!
//! The crate receives requests already parsed by a transport layer and
//! returns either a resolved client / validation context or an
//! [`OidcError`]. It never touches HTTP.
//!
//! ## Modules
//!
//! - [`client_auth`] - per-method client authenticators and their composite
//! - [`ciba`] - backchannel authentication request validators
//! - [`jwt`] - JWT signature and claim validation against lazy key streams
//! - [`claims`] - JWT claim types
//! - [`error`] - OAuth 2.0 / OIDC / CIBA error taxonomy
//! - [`services`] - collaborators shared by authenticators and validators

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod ciba;
pub mod claims;
pub mod client_auth;
pub mod error;
pub mod jwt;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use ciba::{
    BackChannelAuthenticationRequest, BackChannelAuthenticationValidator,
    BackChannelRequestValidator, LoginHintToken, ValidationContext,
};
pub use claims::{Audience, JwtClaims};
pub use client_auth::{
    ClientAuthenticator, ClientRequest, CompositeClientAuthenticator, CLIENT_ASSERTION_TYPE_JWT,
};
pub use error::{ErrorResponse, OidcError, OidcResult};
pub use jwt::{JwtError, JwtExpectations, JwtValidator, ValidatedJwt};
pub use services::ProviderServices;
