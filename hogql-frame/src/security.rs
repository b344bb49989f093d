//! Credential handling.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string that automatically clears its contents when dropped.
///
/// Used for the PostHog personal API key so that it never shows up in
/// `Debug` output and does not linger in memory after the datasource is gone.
#[derive(Clone, Default, ZeroizeOnDrop)]
pub struct SecureString(String);

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(***)")
    }
}

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the string value. Use carefully and avoid storing the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if no secret was provided.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a regular string. The SecureString will be zeroized.
    pub fn into_string(mut self) -> String {
        let value = std::mem::take(&mut self.0);
        self.0.zeroize();
        value
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_debug_is_redacted() {
        let secret = SecureString::new("phx_secret_key");
        assert_eq!(format!("{secret:?}"), "SecureString(***)");
        assert_eq!(secret.expose(), "phx_secret_key");
    }

    #[test]
    fn test_secure_string_into_string() {
        let secret = SecureString::from("phx_abc");
        assert!(!secret.is_empty());
        assert_eq!(secret.into_string(), "phx_abc");
    }

    #[test]
    fn test_secure_string_empty() {
        assert!(SecureString::default().is_empty());
        assert!(SecureString::from(String::new()).is_empty());
    }
}
