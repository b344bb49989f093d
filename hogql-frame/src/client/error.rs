use thiserror::Error;

/// Errors that can occur when talking to the PostHog query API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Authentication failed (invalid or expired API key, missing scopes).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Network error (connection failed, timeout, etc.).
    #[error("Network error: {message}")]
    Network { message: String },

    /// Rate limited by the server.
    #[error("Rate limited. Retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The API answered with a non-success status.
    #[error("PostHog API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request or response body could not be (de)serialized.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// The client could not be configured.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ClientError {
    /// Returns true if this error is transient and the request should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network { .. } => true,
            ClientError::RateLimited { .. } => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns the suggested retry delay in seconds, if available.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ClientError::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 400,
            message: "Unknown table 'evnts'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "PostHog API error (400): Unknown table 'evnts'"
        );
    }

    #[test]
    fn test_client_error_is_retryable() {
        assert!(!ClientError::Authentication {
            message: "test".to_string()
        }
        .is_retryable());
        assert!(ClientError::Network {
            message: "timeout".to_string()
        }
        .is_retryable());
        assert!(ClientError::RateLimited {
            retry_after_secs: Some(60)
        }
        .is_retryable());
        assert!(ClientError::Api {
            status: 502,
            message: "bad gateway".to_string()
        }
        .is_retryable());
        assert!(!ClientError::Api {
            status: 400,
            message: "syntax error".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(
            ClientError::RateLimited {
                retry_after_secs: Some(3)
            }
            .retry_after(),
            Some(3)
        );
        assert_eq!(
            ClientError::Network {
                message: "reset".to_string()
            }
            .retry_after(),
            None
        );
    }
}
