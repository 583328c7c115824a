//! # op-core
//!
//! Core utilities, configuration, and error handling for the OpenID provider.
//!
//! This crate provides foundational types shared by the authentication and
//! validation crates:
//!
//! - [`config`] - provider settings consumed by client authentication and CIBA
//! - [`error`] - core error type
//! - [`event`] - structured audit events emitted through `tracing`
//! - [`clock`] - injectable time source

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod event;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ProviderConfig;
pub use error::{CoreError, CoreResult};
pub use event::{Event, EventBuilder, EventOutcome, EventType};
