use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::{ClientError, ClientResult, QueryExecutor};
use crate::config::ClientConfig;
use crate::query::QueryResult;

/// Query kind understood by the `/query/` endpoint for raw HogQL.
pub const HOGQL_QUERY_KIND: &str = "HogQLQuery";

/// Request body for the query endpoint.
#[derive(Debug, Serialize)]
pub struct HogQLRequest<'a> {
    pub query: HogQLQueryBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct HogQLQueryBody<'a> {
    pub kind: &'a str,
    pub query: &'a str,
}

impl<'a> HogQLRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query: HogQLQueryBody {
                kind: HOGQL_QUERY_KIND,
                query,
            },
        }
    }
}

/// HTTP client for the PostHog query API.
#[derive(Clone)]
pub struct PostHogClient {
    config: Arc<ClientConfig>,
    client: Client,
}

impl std::fmt::Debug for PostHogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostHogClient")
            .field("query_url", &self.config.query_url())
            .finish_non_exhaustive()
    }
}

impl PostHogClient {
    /// Create a new client with the given configuration.
    ///
    /// The configuration is only validated when a query is executed, so a
    /// half-configured datasource can still be instantiated and report what
    /// is missing from its health check.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Run a HogQL query, retrying transient failures.
    #[instrument(skip(self, query), fields(project = %self.config.project_id()))]
    pub async fn execute(&self, query: &str) -> ClientResult<QueryResult> {
        self.config
            .validate()
            .map_err(|e| ClientError::Configuration {
                message: e.to_string(),
            })?;

        let body =
            serde_json::to_vec(&HogQLRequest::new(query)).map_err(|e| ClientError::Serialization {
                message: format!("failed to marshal request: {e}"),
            })?;

        let mut attempt = 0;
        loop {
            let started = Instant::now();
            match self.send(&body).await {
                Ok(result) => {
                    debug!(
                        rows = result.row_count(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "HogQL query succeeded"
                    );
                    return Ok(result);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries() => {
                    let delay = self.calculate_backoff(attempt, e.retry_after());
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying HogQL query"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send(&self, body: &[u8]) -> ClientResult<QueryResult> {
        let response = self
            .client
            .post(self.config.query_url())
            .bearer_auth(self.config.api_key().expose())
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| ClientError::Network {
                message: e.to_string(),
            })?;

        self.handle_response(response).await
    }

    /// Decode a successful body, or map an error status to a [`ClientError`].
    ///
    /// Error bodies carry a human readable `detail` which is preferred over
    /// the raw body text.
    async fn handle_response(&self, response: reqwest::Response) -> ClientResult<QueryResult> {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body = response.bytes().await.map_err(|e| ClientError::Network {
            message: format!("failed to read response: {e}"),
        })?;

        if status.is_success() {
            return QueryResult::from_json(&body).map_err(|e| ClientError::Serialization {
                message: format!("failed to unmarshal response: {e}"),
            });
        }

        let message = QueryResult::from_json(&body)
            .ok()
            .and_then(|r| r.detail_message().map(str::to_string))
            .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());

        Err(match status.as_u16() {
            401 | 403 => ClientError::Authentication { message },
            429 => ClientError::RateLimited {
                retry_after_secs: retry_after,
            },
            status => ClientError::Api { status, message },
        })
    }

    /// Exponential backoff with jitter.
    ///
    /// `base * 2^attempt` with the exponent capped at 5, plus up to half the
    /// base in random jitter. A server-provided `Retry-After` replaces the
    /// configured base delay.
    fn calculate_backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        let base = retry_after
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.config.retry_base_delay());
        let backoff = base * (1u32 << attempt.min(5));

        let jitter_cap = (base.as_millis() / 2) as u64;
        let jitter_ms = if jitter_cap == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_cap)
        };
        backoff + Duration::from_millis(jitter_ms)
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl QueryExecutor for PostHogClient {
    async fn execute_hogql(&self, query: &str) -> ClientResult<QueryResult> {
        self.execute(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("test-key").with_project_id("1")
    }

    #[test]
    fn test_client_creation() {
        assert!(PostHogClient::new(config()).is_ok());
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_config() {
        let client = PostHogClient::new(ClientConfig::new("test-key")).unwrap();
        let err = client.execute("SELECT 1").await.unwrap_err();
        assert!(matches!(err, ClientError::Configuration { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_request_wire_format() {
        let body = serde_json::to_value(HogQLRequest::new("SELECT 1")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"query": {"kind": "HogQLQuery", "query": "SELECT 1"}})
        );
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let client =
            PostHogClient::new(config().with_retry_base_delay(Duration::from_millis(100))).unwrap();

        let first = client.calculate_backoff(0, None);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(150));

        let third = client.calculate_backoff(2, None);
        assert!(third >= Duration::from_millis(400) && third <= Duration::from_millis(450));

        let capped = client.calculate_backoff(30, None);
        assert!(capped >= Duration::from_millis(3200) && capped <= Duration::from_millis(3250));

        let server = client.calculate_backoff(0, Some(2));
        assert!(server >= Duration::from_secs(2) && server <= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let client = PostHogClient::new(
            config()
                .with_base_url("http://localhost:1")
                .with_max_retries(0),
        )
        .unwrap();

        let err = client.execute("SELECT 1").await.unwrap_err();
        assert!(matches!(err, ClientError::Network { .. }));
    }
}
