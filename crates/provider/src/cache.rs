//! Per-scope-set token cache
//!
//! Maps a canonical scope key to the most recently obtained token for that
//! key. Entries are overwritten on refresh and never evicted; the cache
//! lives as long as its owning provider and is never shared across provider
//! instances.
//!
//! The mutex is held only across map access, never across a network round
//! trip, so two concurrent misses for the same key may both trigger an
//! upstream exchange. Whichever write lands last wins; entries are replaced
//! as whole values, so readers always observe a complete old or new entry.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use common::{Scope, join_scopes};
use tokio::sync::Mutex;
use tracing::debug;

/// A token held in the cache.
///
/// `expires_in` is the original issuance-relative lifetime in seconds;
/// `expires_at` is the absolute expiry as a unix millisecond timestamp,
/// computed at storage time. The entry is valid while `expires_at` is
/// strictly in the future.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub expires_at: u64,
}

/// Cache of tokens keyed by canonical scope key.
pub struct TokenCache {
    entries: Mutex<HashMap<String, CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a clone of the entry for a key, valid or not.
    pub async fn get(&self, key: &str) -> Option<CachedToken> {
        let entries = self.entries.lock().await;
        entries.get(key).cloned()
    }

    /// Insert or replace the entry for a key.
    pub async fn put(&self, key: String, entry: CachedToken) {
        let mut entries = self.entries.lock().await;
        debug!(scopes = %key, expires_at = entry.expires_at, "cached token");
        entries.insert(key, entry);
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical cache key for a scope set.
///
/// Scopes are joined in request order without sorting, so the same scopes
/// requested in a different order produce a different key. Callers should
/// request scopes in a consistent order to benefit from caching.
pub(crate) fn cache_key(scopes: &[Scope]) -> String {
    join_scopes(scopes, "+")
}

/// Current time as a unix millisecond timestamp.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
