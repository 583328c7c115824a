//! JWT replay registry.
//!
//! Tracks one-time-use status of JWT identifiers. Entries live until the
//! token they describe expires; after that the token is rejected on its
//! own lifetime and the entry is no longer needed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use op_core::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::CacheResult;

/// Status recorded for a JWT identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonWebTokenStatus {
    /// The token has been presented once and must not be accepted again.
    Used,
    /// The token was revoked before use.
    Revoked,
}

/// Replay registry provider.
///
/// `set_status` is the single write requiring at-most-once semantics per
/// identifier; implementations backed by a shared store must make it
/// atomic.
#[async_trait]
pub trait TokenRegistry: Send + Sync {
    /// Gets the recorded status of a token identifier.
    ///
    /// Returns `None` if nothing is recorded or the entry has expired.
    async fn get_status(&self, jti: &str) -> CacheResult<Option<JsonWebTokenStatus>>;

    /// Records a status for a token identifier until `expires_at`.
    async fn set_status(
        &self,
        jti: &str,
        status: JsonWebTokenStatus,
        expires_at: DateTime<Utc>,
    ) -> CacheResult<()>;
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    status: JsonWebTokenStatus,
    expires_at: DateTime<Utc>,
}

/// In-memory replay registry.
pub struct InMemoryTokenRegistry {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTokenRegistry {
    /// Creates a registry on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a registry on the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Checks whether the registry holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops expired entries and returns how many were removed.
    pub async fn remove_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let initial_len = entries.len();
        entries.retain(|_, entry| entry.expires_at >= now);
        initial_len - entries.len()
    }
}

impl Default for InMemoryTokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTokenRegistry").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenRegistry for InMemoryTokenRegistry {
    async fn get_status(&self, jti: &str) -> CacheResult<Option<JsonWebTokenStatus>> {
        let now = self.clock.now();
        Ok(self
            .entries
            .read()
            .await
            .get(jti)
            .filter(|entry| entry.expires_at >= now)
            .map(|entry| entry.status))
    }

    async fn set_status(
        &self,
        jti: &str,
        status: JsonWebTokenStatus,
        expires_at: DateTime<Utc>,
    ) -> CacheResult<()> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at >= now);
        entries.insert(jti.to_string(), Entry { status, expires_at });
        tracing::trace!(jti, ?status, %expires_at, "token status recorded");
        Ok(())
    }
}
