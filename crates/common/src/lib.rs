//! Shared types for the Forge client crates

mod region;
mod scope;
mod secret;

pub use region::{DEFAULT_HOST, Region};
pub use scope::{Scope, join_scopes};
pub use secret::ClientSecret;
