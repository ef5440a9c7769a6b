//! Token exchange against the authentication endpoints
//!
//! Three grant types are supported:
//! 1. `client_credentials` — two-legged, app-only access
//! 2. `authorization_code` — three-legged, completes the user flow
//! 3. `refresh_token` — renews a three-legged token
//!
//! All three POST a form to a token endpoint and deserialize the same
//! response shape.

use common::{Scope, join_scopes};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{AUTHENTICATE_PATH, GET_TOKEN_PATH, REFRESH_TOKEN_PATH};
use crate::error::{Error, Result};

/// Response from a token endpoint for all grant types.
///
/// `expires_in` is a delta in seconds from the response time. Callers that
/// cache tokens convert it to an absolute timestamp at storage time.
/// `refresh_token` is only present in three-legged responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Exchange client credentials for a two-legged access token.
///
/// The token is granted for exactly the requested scopes; requesting a
/// scope the application is not entitled to fails the whole exchange.
pub async fn authenticate(
    client: &reqwest::Client,
    host: &str,
    client_id: &str,
    client_secret: &str,
    scopes: &[Scope],
) -> Result<TokenResponse> {
    let scope = join_scopes(scopes, " ");
    debug!(%scope, "requesting two-legged token");
    token_request(
        client,
        &format!("{host}{AUTHENTICATE_PATH}"),
        &[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
            ("scope", &scope),
        ],
    )
    .await
}

/// Exchange an authorization code for a three-legged token.
///
/// Second step of the three-legged flow: the user has authorized in their
/// browser and the callback received the authorization code. The redirect
/// URI must match the one used to build the authorization URL.
pub async fn exchange_code(
    client: &reqwest::Client,
    host: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
) -> Result<TokenResponse> {
    token_request(
        client,
        &format!("{host}{GET_TOKEN_PATH}"),
        &[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ],
    )
    .await
}

/// Refresh a three-legged access token using a refresh token.
pub async fn refresh_token(
    client: &reqwest::Client,
    host: &str,
    client_id: &str,
    client_secret: &str,
    refresh: &str,
) -> Result<TokenResponse> {
    token_request(
        client,
        &format!("{host}{REFRESH_TOKEN_PATH}"),
        &[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh),
        ],
    )
    .await
}

/// POST a form to a token endpoint and deserialize the token response.
///
/// 401/403 means the supplied credentials (or refresh token) were rejected;
/// any other non-success status is reported as a failed exchange together
/// with the response body.
async fn token_request(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse> {
    let response = client
        .post(url)
        .form(params)
        .send()
        .await
        .map_err(|e| Error::Http(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::InvalidCredentials(format!(
                "credentials rejected ({status}): {body}"
            )));
        }

        return Err(Error::TokenExchange(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))
}
