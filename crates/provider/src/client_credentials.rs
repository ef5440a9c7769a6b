//! Two-legged provider with per-scope token caching
//!
//! Each `get_token` call resolves against the cache first and only goes to
//! the token endpoint when forced, on a miss, or when the cached entry has
//! expired. The reported `expires_in` is recomputed from the stored absolute
//! expiry on every call, so repeated calls against a cached entry see a
//! monotonically decreasing remaining lifetime.

use std::future::Future;
use std::pin::Pin;

use common::{ClientSecret, DEFAULT_HOST, Scope};
use tracing::{debug, info};

use crate::cache::{CachedToken, TokenCache, cache_key, now_millis};
use crate::{AccessToken, AuthProvider, Result};

/// Provider running the two-legged client-credentials exchange.
///
/// Owns its token cache exclusively; two provider instances never share
/// cached state. Concurrent calls for the same scope set may each perform
/// an exchange when the cache is cold (no single-flight deduplication);
/// the last completed exchange overwrites the cache entry.
pub struct ClientCredentialsProvider {
    client_id: String,
    client_secret: ClientSecret,
    host: String,
    http: reqwest::Client,
    cache: TokenCache,
}

impl ClientCredentialsProvider {
    pub fn new(client_id: impl Into<String>, client_secret: ClientSecret) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            host: DEFAULT_HOST.into(),
            http: reqwest::Client::new(),
            cache: TokenCache::new(),
        }
    }

    /// Route token exchanges to a different host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    async fn acquire(&self, scopes: &[Scope], force: bool) -> Result<AccessToken> {
        let key = cache_key(scopes);
        let now = now_millis();

        if !force {
            if let Some(entry) = self.cache.get(&key).await {
                if entry.expires_at > now {
                    debug!(scopes = %key, "token cache hit");
                    return Ok(remaining(entry, now));
                }
                debug!(scopes = %key, "cached token expired");
            }
        }

        info!(scopes = %key, force, "exchanging client credentials for token");
        let response = forge_auth::authenticate(
            &self.http,
            &self.host,
            &self.client_id,
            self.client_secret.expose(),
            scopes,
        )
        .await?;

        let now = now_millis();
        let entry = CachedToken {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            expires_at: now + response.expires_in * 1000,
        };
        self.cache.put(key, entry.clone()).await;
        Ok(remaining(entry, now))
    }
}

impl AuthProvider for ClientCredentialsProvider {
    fn get_token<'a>(
        &'a self,
        scopes: &'a [Scope],
        force: bool,
    ) -> Pin<Box<dyn Future<Output = Result<AccessToken>> + Send + 'a>> {
        Box::pin(self.acquire(scopes, force))
    }
}

/// Turn a cache entry into a token whose `expires_in` reflects the lifetime
/// remaining right now, rounded to the nearest second. Never the stored
/// issuance-relative value.
fn remaining(entry: CachedToken, now: u64) -> AccessToken {
    AccessToken {
        access_token: entry.access_token,
        token_type: entry.token_type,
        expires_in: (entry.expires_at.saturating_sub(now) + 500) / 1000,
    }
}
