//! # op-cache
//!
//! Short-lived state shared between requests.
//!
//! - [`TokenRegistry`] - one-time-use status of JWT identifiers (`jti`)
//! - [`InMemoryTokenRegistry`] - process-local registry that forgets
//!   entries once their token has expired
//!
//! ## Example
//!
//! ```ignore
//! use op_cache::{JsonWebTokenStatus, TokenRegistry};
//!
//! async fn consume(registry: &impl TokenRegistry, jti: &str, exp: DateTime<Utc>) -> CacheResult<bool> {
//!     if registry.get_status(jti).await? == Some(JsonWebTokenStatus::Used) {
//!         return Ok(false);
//!     }
//!     registry.set_status(jti, JsonWebTokenStatus::Used, exp).await?;
//!     Ok(true)
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod registry;

pub use error::{CacheError, CacheResult};
pub use registry::{InMemoryTokenRegistry, JsonWebTokenStatus, TokenRegistry};
