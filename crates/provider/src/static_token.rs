//! Provider wrapping a fixed bearer token
//!
//! The token is supplied at construction and returned as-is for every
//! request. Its real remaining lifetime is unknown without decoding it, so
//! a nominal lifetime is reported instead and the token never expires from
//! the caller's perspective.

use std::future::Future;
use std::pin::Pin;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use common::Scope;
use tracing::warn;

use crate::{AccessToken, AuthProvider, Result};

/// Nominal lifetime reported for a static token; the true expiry is not
/// tracked.
const STATIC_TOKEN_LIFETIME: u64 = 3600;

/// Provider that hands out one fixed token for every scope set.
///
/// If the token is a JWT, its claims are inspected (without signature
/// verification) and a warning is logged when a requested scope is missing
/// from the token's scope claim or when the token appears to be expired.
/// Neither condition fails the call; the token is returned unchanged.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Best-effort inspection of the token's self-describing claims.
    /// Tokens that are not decodable JWTs are skipped silently.
    fn validate(&self, scopes: &[Scope]) {
        let Some(claims) = decode_claims(&self.token) else {
            return;
        };

        for scope in scopes {
            if !claim_grants_scope(&claims, scope.as_str()) {
                warn!(scope = %scope, "supplied token does not carry a requested scope");
            }
        }

        if let Some(exp) = claims.get("exp").and_then(|v| v.as_u64()) {
            if exp * 1000 <= crate::cache::now_millis() {
                warn!("supplied token appears to be expired");
            }
        }
    }
}

impl AuthProvider for StaticTokenProvider {
    fn get_token<'a>(
        &'a self,
        scopes: &'a [Scope],
        _force: bool,
    ) -> Pin<Box<dyn Future<Output = Result<AccessToken>> + Send + 'a>> {
        Box::pin(async move {
            self.validate(scopes);
            Ok(AccessToken {
                access_token: self.token.clone(),
                token_type: "Bearer".into(),
                expires_in: STATIC_TOKEN_LIFETIME,
            })
        })
    }
}

/// Decode the payload segment of a JWT without verifying its signature.
fn decode_claims(token: &str) -> Option<serde_json::Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Check whether a scope claim (array or space-joined string) grants a scope.
fn claim_grants_scope(claims: &serde_json::Value, scope: &str) -> bool {
    match claims.get("scope") {
        Some(serde_json::Value::Array(granted)) => {
            granted.iter().any(|v| v.as_str() == Some(scope))
        }
        Some(serde_json::Value::String(granted)) => {
            granted.split(' ').any(|granted| granted == scope)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an unsigned JWT with the given payload claims.
    fn fake_jwt(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.sig")
    }

    #[tokio::test]
    async fn returns_token_unchanged_with_nominal_lifetime() {
        let provider = StaticTokenProvider::new("opaque-token");
        let token = provider.get_token(&[Scope::DataRead], false).await.unwrap();
        assert_eq!(token.access_token, "opaque-token");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);
    }

    #[tokio::test]
    async fn force_has_no_effect_on_static_tokens() {
        let provider = StaticTokenProvider::new("opaque-token");
        let relaxed = provider.get_token(&[Scope::DataRead], false).await.unwrap();
        let forced = provider.get_token(&[Scope::DataRead], true).await.unwrap();
        assert_eq!(relaxed.access_token, forced.access_token);
        assert_eq!(relaxed.expires_in, forced.expires_in);
    }

    #[tokio::test]
    async fn missing_scope_still_returns_token() {
        let jwt = fake_jwt(serde_json::json!({ "scope": ["data:read"] }));
        let provider = StaticTokenProvider::new(jwt.clone());

        // data:write is not in the token's scope claim; a warning is logged
        // but the call must succeed with the token unchanged
        let token = provider
            .get_token(&[Scope::DataWrite], false)
            .await
            .unwrap();
        assert_eq!(token.access_token, jwt);
    }

    #[tokio::test]
    async fn expired_jwt_still_returns_token() {
        let jwt = fake_jwt(serde_json::json!({ "scope": ["data:read"], "exp": 1 }));
        let provider = StaticTokenProvider::new(jwt.clone());
        let token = provider.get_token(&[Scope::DataRead], false).await.unwrap();
        assert_eq!(token.access_token, jwt);
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn decode_claims_handles_space_joined_scope_strings() {
        let jwt = fake_jwt(serde_json::json!({ "scope": "data:read bucket:read" }));
        let claims = decode_claims(&jwt).unwrap();
        assert!(claim_grants_scope(&claims, "bucket:read"));
        assert!(!claim_grants_scope(&claims, "data:write"));
    }

    #[test]
    fn decode_claims_rejects_opaque_tokens() {
        assert!(decode_claims("not-a-jwt").is_none());
        assert!(decode_claims("a.%%%.c").is_none());
    }
}
