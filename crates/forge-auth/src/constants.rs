//! Authentication endpoint paths
//!
//! All paths are relative to the configured host (see `common::DEFAULT_HOST`)
//! so the same flows work against a host override in tests.

/// Token endpoint for the two-legged client-credentials exchange
pub const AUTHENTICATE_PATH: &str = "/authentication/v1/authenticate";

/// Authorization endpoint the user is redirected to in the three-legged flow
pub const AUTHORIZE_PATH: &str = "/authentication/v1/authorize";

/// Token endpoint for the three-legged authorization-code exchange
pub const GET_TOKEN_PATH: &str = "/authentication/v1/gettoken";

/// Token endpoint for refreshing a three-legged access token
pub const REFRESH_TOKEN_PATH: &str = "/authentication/v1/refreshtoken";
