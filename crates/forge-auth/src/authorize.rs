//! Authorization URL construction for the three-legged flow
//!
//! The user is redirected to this URL, authorizes the application, and the
//! authorization server redirects back to `redirect_uri` with a `code`
//! query parameter to be passed to `token::exchange_code()`.

use common::{Scope, join_scopes};

use crate::constants::AUTHORIZE_PATH;

/// Build the full authorization URL with all required parameters.
///
/// Scopes are space-joined before encoding, matching the format the
/// authorization endpoint expects.
pub fn authorization_url(
    host: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[Scope],
) -> String {
    format!(
        "{}{}?response_type=code&client_id={}&redirect_uri={}&scope={}",
        host,
        AUTHORIZE_PATH,
        client_id,
        urlencoded(redirect_uri),
        urlencoded(&join_scopes(scopes, " ")),
    )
}

/// Minimal URL encoding for parameter values.
/// Only encodes characters that would break URL parameter parsing.
fn urlencoded(s: &str) -> String {
    s.replace(' ', "%20")
        .replace(':', "%3A")
        .replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::DEFAULT_HOST;

    #[test]
    fn url_contains_required_params() {
        let url = authorization_url(
            DEFAULT_HOST,
            "client-123",
            "https://example.com/callback",
            &[Scope::DataRead, Scope::ViewablesRead],
        );

        assert!(url.starts_with(DEFAULT_HOST));
        assert!(url.contains(AUTHORIZE_PATH));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fcallback"));
    }

    #[test]
    fn scopes_are_space_joined_and_encoded() {
        let url = authorization_url(
            DEFAULT_HOST,
            "id",
            "https://example.com/cb",
            &[Scope::DataRead, Scope::ViewablesRead],
        );
        assert!(url.contains("scope=data%3Aread%20viewables%3Aread"), "got: {url}");
    }

    #[test]
    fn host_override_is_respected() {
        let url = authorization_url("https://proxy.local", "id", "https://example.com/cb", &[]);
        assert!(url.starts_with("https://proxy.local/authentication/v1/authorize?"));
    }
}
