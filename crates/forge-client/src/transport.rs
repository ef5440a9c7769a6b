//! Shared request plumbing for the resource clients
//!
//! Holds the HTTP client, host, region, and credential provider one client
//! instance works with. Every request goes through `send`, which surfaces
//! non-success statuses verbatim; bodies are mapped by the callers.

use std::sync::Arc;

use common::{Region, Scope};
use provider::{AccessToken, AuthProvider};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, Result};
use crate::{ClientOptions, Credentials};

pub(crate) struct Transport {
    pub(crate) http: reqwest::Client,
    pub(crate) host: String,
    pub(crate) region: Region,
    provider: Arc<dyn AuthProvider>,
}

impl Transport {
    pub(crate) fn new(credentials: Credentials, options: ClientOptions) -> Self {
        let provider = credentials.into_provider(&options.host);
        Self {
            http: reqwest::Client::new(),
            host: options.host,
            region: options.region,
            provider,
        }
    }

    /// Acquire a token for the given scope set from the credential provider.
    pub(crate) async fn token(&self, scopes: &[Scope]) -> Result<AccessToken> {
        Ok(self.provider.get_token(scopes, false).await?)
    }

    /// Absolute URL for a host-relative path.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.host)
    }

    /// Execute a request and surface non-success statuses as errors.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            warn!(status = status.as_u16(), "endpoint rejected request");
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Deserialize a response body.
    pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Unexpected(format!("invalid response body: {e}")))
    }

    /// Read a response body as raw bytes.
    pub(crate) async fn bytes(response: Response) -> Result<Vec<u8>> {
        Ok(response
            .bytes()
            .await
            .map_err(|e| Error::Unexpected(format!("reading response body: {e}")))?
            .to_vec())
    }
}
