//! Authentication flows for the Forge REST API
//!
//! Covers the token endpoint interactions the resource clients build on:
//! two-legged client-credentials exchange, three-legged authorization-code
//! exchange with token refresh, and construction of the authorization URL
//! a user is redirected to in the three-legged flow.
//!
//! Two-legged flow:
//! 1. `token::authenticate()` with client id/secret and the requested scopes
//! 2. The returned access token is presented as a Bearer credential
//!
//! Three-legged flow:
//! 1. Redirect the user to `authorize::authorization_url()`
//! 2. `token::exchange_code()` with the authorization code from the callback
//! 3. `token::refresh_token()` whenever the access token runs out

pub mod authorize;
pub mod constants;
pub mod error;
pub mod token;

pub use authorize::authorization_url;
pub use constants::*;
pub use error::{Error, Result};
pub use token::{TokenResponse, authenticate, exchange_code, refresh_token};
