//! Permission scopes requested during token exchange
//!
//! Every API operation requires a token granted for a fixed set of scopes.
//! Read-only operations use a narrower set than mutating ones; the resource
//! clients pick the set, callers never deal with scopes directly unless they
//! drive the auth flows themselves.

/// A permission that can be requested for an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    BucketCreate,
    BucketRead,
    BucketUpdate,
    BucketDelete,
    DataRead,
    DataWrite,
    DataCreate,
    DataSearch,
    CodeAll,
    AccountRead,
    AccountWrite,
    UserProfileRead,
    ViewablesRead,
}

impl Scope {
    /// Wire representation of the scope, as sent in the `scope` form field
    /// and as found in token scope claims.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::BucketCreate => "bucket:create",
            Scope::BucketRead => "bucket:read",
            Scope::BucketUpdate => "bucket:update",
            Scope::BucketDelete => "bucket:delete",
            Scope::DataRead => "data:read",
            Scope::DataWrite => "data:write",
            Scope::DataCreate => "data:create",
            Scope::DataSearch => "data:search",
            Scope::CodeAll => "code:all",
            Scope::AccountRead => "account:read",
            Scope::AccountWrite => "account:write",
            Scope::UserProfileRead => "user-profile:read",
            Scope::ViewablesRead => "viewables:read",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join scopes with a separator, preserving request order.
///
/// Used both for the space-joined `scope` request parameter and for cache
/// keys. No sorting happens here, so callers that want to benefit from
/// token caching should request scopes in a consistent order.
pub fn join_scopes(scopes: &[Scope], separator: &str) -> String {
    scopes
        .iter()
        .map(|scope| scope.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}
