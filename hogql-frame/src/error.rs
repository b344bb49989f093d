//! Error types for HogQL result transcoding.
//!
//! Transcoding is deliberately forgiving: individual cells that cannot be
//! coerced become nulls and never surface here. The only fatal transcoding
//! condition is a type-tag field that matches neither wire shape. The
//! remaining variants belong to the layers around the core (settings,
//! response decoding, Arrow export).

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The response's `types` field is present but is neither a list of type
    /// names nor a list of type pairs.
    #[error("unexpected types format: {found}")]
    MalformedTypeTags {
        /// The offending field, rendered as compact JSON and truncated
        found: String,
    },

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error when decoding an API body or query model.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error related to datasource configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, FrameError>`.
///
/// # Examples
///
/// ```rust
/// use hogql_frame::error::Result;
///
/// fn transcode_nothing() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, FrameError>;

impl FrameError {
    /// Creates a malformed type tags error from the raw field.
    pub fn malformed_type_tags(raw: &serde_json::Value) -> Self {
        Self::MalformedTypeTags {
            found: crate::logging::truncate_field(&raw.to_string(), 256),
        }
    }

    /// Returns true if this error came from the upstream type-tag contract.
    pub fn is_malformed_type_tags(&self) -> bool {
        matches!(self, Self::MalformedTypeTags { .. })
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<FrameError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                FrameError::Configuration(inner) => {
                    FrameError::Configuration(format!("{msg}: {inner}"))
                }
                FrameError::Serialization(inner) => {
                    FrameError::Serialization(format!("{msg}: {inner}"))
                }
                FrameError::Internal(inner) => FrameError::Internal(format!("{msg}: {inner}")),
                other => FrameError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_type_tags_display() {
        let err = FrameError::malformed_type_tags(&json!({"a": 1}));
        assert_eq!(err.to_string(), r#"unexpected types format: {"a":1}"#);
        assert!(err.is_malformed_type_tags());
    }

    #[test]
    fn test_malformed_type_tags_truncates_large_fields() {
        let raw = json!("x".repeat(1000));
        let err = FrameError::malformed_type_tags(&raw);
        assert!(err.to_string().ends_with("...(truncated)"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let err: FrameError = serde_json::from_str::<Vec<String>>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, FrameError::Serialization(_)));
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(FrameError::Configuration("missing projectId".to_string()))
        }

        let err = failing_operation()
            .context("could not load settings")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: could not load settings: missing projectId"
        );
    }

    #[test]
    fn test_error_context_wraps_other_variants() {
        let result: std::result::Result<(), FrameError> =
            Err(FrameError::malformed_type_tags(&json!(1)));
        let err = result.with_context(|| "decoding".to_string()).unwrap_err();
        assert!(matches!(err, FrameError::Internal(_)));
        assert!(err.to_string().contains("decoding"));
    }
}
