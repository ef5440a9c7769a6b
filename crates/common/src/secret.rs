//! Redacting wrapper for the application client secret

use std::fmt;
use zeroize::Zeroize;

/// Client secret used during token exchange.
///
/// Never printed: `Debug` and `Display` both render `[REDACTED]`, and the
/// backing string is zeroized on drop. Use [`ClientSecret::expose`] at the
/// single point where the secret goes into a request form.
pub struct ClientSecret(String);

impl ClientSecret {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value (use sparingly).
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for ClientSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Clone for ClientSecret {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl From<String> for ClientSecret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ClientSecret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_are_redacted() {
        let secret = ClientSecret::new("app-secret");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn expose_returns_value() {
        let secret = ClientSecret::new("app-secret");
        assert_eq!(secret.expose(), "app-secret");
    }

    #[test]
    fn conversions_wrap_value() {
        let from_str: ClientSecret = "abc".into();
        let from_string: ClientSecret = String::from("abc").into();
        assert_eq!(from_str.expose(), from_string.expose());
    }
}
