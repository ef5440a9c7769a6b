//! Resource clients for the Forge REST API
//!
//! One client per API surface: `OssClient` (buckets and objects),
//! `DataManagementClient` (hubs, projects, folders, items, versions) and
//! `ModelDerivativeClient` (translation jobs, manifests, derivatives).
//! Every method acquires a token scoped to the operation from its
//! credential provider, invokes the endpoint, and maps the body to a typed
//! return value; listing endpoints with cursors are exposed as lazy batch
//! streams (see `pagination`).

pub mod dm;
pub mod error;
pub mod md;
pub mod oss;
pub mod pagination;

mod transport;

pub use dm::DataManagementClient;
pub use error::{Error, Result};
pub use md::{ModelDerivativeClient, ThumbnailSize, urnify};
pub use oss::OssClient;
pub use pagination::{Page, paginate};

use std::sync::Arc;

use common::{ClientSecret, DEFAULT_HOST, Region};
use provider::{AuthProvider, ClientCredentialsProvider, StaticTokenProvider};

/// Credentials a client is constructed with.
///
/// The variant picks the credential provider once at construction time;
/// everything after that goes through the `AuthProvider` trait, so a custom
/// strategy plugs in without touching client code.
pub enum Credentials {
    /// Fixed bearer token, used as-is for every request
    Token(String),
    /// Application id/secret for the two-legged flow with token caching
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
    /// Caller-supplied provider implementation
    Custom(Arc<dyn AuthProvider>),
}

impl Credentials {
    fn into_provider(self, host: &str) -> Arc<dyn AuthProvider> {
        match self {
            Credentials::Token(token) => Arc::new(StaticTokenProvider::new(token)),
            Credentials::ClientCredentials {
                client_id,
                client_secret,
            } => Arc::new(
                ClientCredentialsProvider::new(client_id, ClientSecret::new(client_secret))
                    .with_host(host),
            ),
            Credentials::Custom(provider) => provider,
        }
    }
}

/// Per-client configuration.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub region: Region,
    pub host: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            region: Region::default(),
            host: DEFAULT_HOST.into(),
        }
    }
}

impl ClientOptions {
    /// Options for a region with the default host.
    pub fn for_region(region: Region) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }
}
