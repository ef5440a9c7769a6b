//! Error types for resource client operations

/// Errors from resource client operations.
///
/// Endpoint rejections carry the upstream status and body verbatim; the
/// client never retries or reinterprets them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Auth(#[from] provider::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Result alias for resource client operations.
pub type Result<T> = std::result::Result<T, Error>;
