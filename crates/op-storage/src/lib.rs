//! # op-storage
//!
//! Lookup traits the OpenID provider core consumes, plus in-memory
//! implementations for tests and embedded use.
//!
//! ## Provider Traits
//!
//! - [`ClientInfoProvider`] - registered clients by `client_id`
//! - [`ClientKeysProvider`] - a client's registered verification keys
//! - [`ServiceKeysProvider`] - the provider's own verification keys
//! - [`ScopeManager`] - scope registry
//! - [`ResourceManager`] - resource registry (RFC 8707)
//!
//! All lookups are async and may suspend on I/O. Cancellation is
//! propagated by dropping the returned future.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod keys;
pub mod resource;
pub mod scope;

pub use client::{ClientInfoProvider, InMemoryClientStore};
pub use error::{StorageError, StorageResult};
pub use keys::{
    ClientKeysProvider, KeyStream, RegisteredClientKeysProvider, ServiceKeysProvider,
    StaticServiceKeys,
};
pub use resource::{InMemoryResourceManager, ResourceManager};
pub use scope::{InMemoryScopeManager, ScopeManager};
