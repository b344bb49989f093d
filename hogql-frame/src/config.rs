//! Datasource settings and HTTP client configuration.
//!
//! The host hands the datasource two blobs when it is instantiated: plain
//! JSON settings (`posthogUrl`, `projectId`) and a map of decrypted secrets
//! (`apiKey`). [`load_settings`] turns those into typed values and
//! [`ClientConfig::from_settings`] derives the transport configuration.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{ErrorContext, FrameError, Result};
use crate::security::SecureString;

/// Key of the API key in the host's decrypted secure settings.
pub const API_KEY_SECRET: &str = "apiKey";

/// Default PostHog cloud endpoint.
pub const DEFAULT_BASE_URL: &str = "https://us.posthog.com";

/// Plain (non-secret) datasource settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceSettings {
    #[serde(default, rename = "posthogUrl")]
    pub posthog_url: String,
    #[serde(default, rename = "projectId")]
    pub project_id: String,
}

/// Secret datasource settings.
#[derive(Debug, Clone, Default)]
pub struct DatasourceSecrets {
    pub api_key: SecureString,
}

/// What the host passes to a new datasource instance.
#[derive(Debug, Clone, Default)]
pub struct InstanceSettings {
    pub json_data: Value,
    pub decrypted_secure_json_data: HashMap<String, String>,
}

/// Loads typed settings and secrets from the host's instance settings.
///
/// Missing fields are left empty; only malformed JSON is an error. Empty
/// values are reported by the health check instead.
pub fn load_settings(
    instance: &InstanceSettings,
) -> Result<(DatasourceSettings, DatasourceSecrets)> {
    let settings = DatasourceSettings::deserialize(&instance.json_data)
        .map_err(|e| FrameError::Configuration(e.to_string()))
        .context("could not unmarshal settings")?;

    let secrets = DatasourceSecrets {
        api_key: instance
            .decrypted_secure_json_data
            .get(API_KEY_SECRET)
            .map(|key| SecureString::new(key.as_str()))
            .unwrap_or_default(),
    };

    Ok((settings, secrets))
}

/// Configuration for the PostHog query API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: SecureString,
    base_url: String,
    project_id: String,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl ClientConfig {
    /// Create a new ClientConfig with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecureString::new(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: String::new(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
        }
    }

    /// Derives a client configuration from loaded settings.
    pub fn from_settings(settings: &DatasourceSettings, secrets: &DatasourceSecrets) -> Self {
        let mut config = Self::new(secrets.api_key.expose()).with_project_id(&settings.project_id);
        if !settings.posthog_url.is_empty() {
            config = config.with_base_url(&settings.posthog_url);
        }
        config
    }

    /// Set the PostHog base URL (e.g. `https://eu.posthog.com`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the PostHog project id.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// Set the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff between retries.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Get the API key.
    ///
    /// # Security
    /// Returns a reference to the secure string. Use `expose()` to access
    /// the underlying value. Avoid storing or logging the exposed value.
    pub fn api_key(&self) -> &SecureString {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    /// The HogQL query endpoint for the configured project.
    pub fn query_url(&self) -> String {
        format!(
            "{}/api/projects/{}/query/",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }

    /// Checks that the configuration can produce a usable endpoint.
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(FrameError::Configuration(
                "project id is missing".to_string(),
            ));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            FrameError::Configuration(format!("invalid PostHog URL '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FrameError::Configuration(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            )));
        }

        Ok(())
    }
}
