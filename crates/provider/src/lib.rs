//! Credential provider abstraction for the resource clients
//!
//! Defines the `AuthProvider` trait that decouples resource clients from the
//! credential acquisition strategy. Two providers ship with the crate:
//! `StaticTokenProvider` wraps a fixed bearer token, and
//! `ClientCredentialsProvider` runs the two-legged exchange with per-scope
//! token caching. Anything else can be plugged in by implementing the same
//! trait; resource clients only ever see `Arc<dyn AuthProvider>`.

pub mod cache;
pub mod client_credentials;
pub mod static_token;

pub use cache::{CachedToken, TokenCache};
pub use client_credentials::ClientCredentialsProvider;
pub use static_token::StaticTokenProvider;

use std::future::Future;
use std::pin::Pin;

use common::Scope;
use serde::{Deserialize, Serialize};

/// A bearer credential ready to be presented on a request.
///
/// `expires_in` is always relative to the moment the token was returned by
/// [`AuthProvider::get_token`], not to when it was originally issued, so a
/// caller checking remaining lifetime after a cache hit gets an accurate
/// answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds of lifetime remaining at the time the token was returned
    pub expires_in: u64,
}

/// Errors from credential providers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("internal provider error: {0}")]
    Internal(String),
}

/// Result alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Abstraction over credential acquisition strategies.
///
/// `get_token` produces a credential valid for the requested scopes. With
/// `force` set, any cached state is bypassed and a fresh credential is
/// obtained from upstream.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn AuthProvider>`).
pub trait AuthProvider: Send + Sync {
    fn get_token<'a>(
        &'a self,
        scopes: &'a [Scope],
        force: bool,
    ) -> Pin<Box<dyn Future<Output = Result<AccessToken>> + Send + 'a>>;
}

impl From<forge_auth::Error> for Error {
    fn from(err: forge_auth::Error) -> Self {
        Error::Auth(err.to_string())
    }
}
