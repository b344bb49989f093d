//! Host-facing datasource handlers.
//!
//! [`PostHogDatasource`] is what a dashboard host talks to: it receives
//! batches of panel queries, runs each one through macro expansion, the
//! query API and the frame builder, and reports per-query successes or
//! failures. It also answers health checks.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use chrono::{TimeZone, Utc};
//! use hogql_frame::client::{ClientResult, QueryExecutor};
//! use hogql_frame::config::{DatasourceSecrets, DatasourceSettings};
//! use hogql_frame::datasource::{DataQuery, PostHogDatasource, QueryDataRequest};
//! use hogql_frame::macros::TimeRange;
//! use hogql_frame::query::QueryResult;
//! use serde_json::json;
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl QueryExecutor for Canned {
//!     async fn execute_hogql(&self, _query: &str) -> ClientResult<QueryResult> {
//!         Ok(QueryResult::new(
//!             vec!["n".to_string()],
//!             Some(json!(["UInt8"])),
//!             vec![vec![json!(1)]],
//!         ))
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let datasource = PostHogDatasource::with_executor(
//!     Arc::new(Canned),
//!     DatasourceSettings::default(),
//!     DatasourceSecrets::default(),
//! );
//! let range = TimeRange::new(
//!     Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap(),
//! );
//! let response = datasource
//!     .query_data(QueryDataRequest {
//!         queries: vec![DataQuery::new("A", json!({"rawHogQL": "SELECT 1"}), range)],
//!     })
//!     .await;
//! assert_eq!(response.responses["A"].frames.len(), 1);
//! # })
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::client::QueryExecutor;
use crate::config::{DatasourceSecrets, DatasourceSettings};
use crate::frame::{Frame, FrameBuilder};
use crate::log_query;
use crate::logging::LogConfig;
use crate::macros::{expand_time_macros, TimeRange};

/// The panel query model stored by the query editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryModel {
    #[serde(default, rename = "queryType")]
    pub query_type: String,
    #[serde(default, rename = "rawHogQL")]
    pub raw_hogql: String,
}

/// One panel query as sent by the host.
#[derive(Debug, Clone)]
pub struct DataQuery {
    pub ref_id: String,
    /// The serialized [`QueryModel`].
    pub json: Value,
    pub time_range: TimeRange,
}

impl DataQuery {
    pub fn new(ref_id: impl Into<String>, json: Value, time_range: TimeRange) -> Self {
        Self {
            ref_id: ref_id.into(),
            json,
            time_range,
        }
    }
}

/// A batch of panel queries.
#[derive(Debug, Clone, Default)]
pub struct QueryDataRequest {
    pub queries: Vec<DataQuery>,
}

/// Classification of a failed query, mirroring HTTP semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    BadRequest,
    Internal,
}

impl ResponseStatus {
    pub fn http_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Internal => 500,
        }
    }
}

/// The outcome of one panel query: frames on success, an error otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataResponse {
    pub frames: Vec<Frame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseError {
    pub status: ResponseStatus,
    pub message: String,
}

impl DataResponse {
    pub fn from_frame(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
            error: None,
        }
    }

    pub fn error(status: ResponseStatus, message: impl Into<String>) -> Self {
        Self {
            frames: Vec::new(),
            error: Some(ResponseError {
                status,
                message: message.into(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Responses keyed by the query's `ref_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryDataResponse {
    pub responses: HashMap<String, DataResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthCheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Ok,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
        }
    }
}

/// A PostHog datasource instance.
pub struct PostHogDatasource {
    executor: Arc<dyn QueryExecutor>,
    settings: DatasourceSettings,
    secrets: DatasourceSecrets,
    builder: FrameBuilder,
    log_config: LogConfig,
}

impl std::fmt::Debug for PostHogDatasource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostHogDatasource")
            .field("settings", &self.settings)
            .field("secrets", &self.secrets)
            .finish_non_exhaustive()
    }
}

impl PostHogDatasource {
    /// Creates a datasource backed by an arbitrary executor.
    pub fn with_executor(
        executor: Arc<dyn QueryExecutor>,
        settings: DatasourceSettings,
        secrets: DatasourceSecrets,
    ) -> Self {
        Self {
            executor,
            settings,
            secrets,
            builder: FrameBuilder::default(),
            log_config: LogConfig::default(),
        }
    }

    /// Creates a datasource talking to PostHog over HTTP.
    ///
    /// # Errors
    ///
    /// Fails if the settings cannot be decoded or the HTTP client cannot be
    /// configured from them.
    #[cfg(feature = "client")]
    pub fn from_instance_settings(
        instance: &crate::config::InstanceSettings,
    ) -> crate::error::Result<Self> {
        use crate::client::PostHogClient;
        use crate::config::{load_settings, ClientConfig};
        use crate::error::FrameError;

        let (settings, secrets) = load_settings(instance)?;
        let client = PostHogClient::new(ClientConfig::from_settings(&settings, &secrets))
            .map_err(|e| FrameError::Configuration(format!("failed to load settings: {e}")))?;

        Ok(Self::with_executor(Arc::new(client), settings, secrets))
    }

    /// Sets the logging configuration used for query logging.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    pub fn settings(&self) -> &DatasourceSettings {
        &self.settings
    }

    /// Handles a batch of queries. Queries run concurrently and fail
    /// independently.
    #[instrument(skip(self, request), fields(queries = request.queries.len()))]
    pub async fn query_data(&self, request: QueryDataRequest) -> QueryDataResponse {
        let responses = join_all(request.queries.iter().map(|query| async move {
            (query.ref_id.clone(), self.execute_query(query).await)
        }))
        .await;

        QueryDataResponse {
            responses: responses.into_iter().collect(),
        }
    }

    /// Handles a single query.
    #[instrument(skip(self, query), fields(ref_id = %query.ref_id))]
    pub async fn execute_query(&self, query: &DataQuery) -> DataResponse {
        let model = match QueryModel::deserialize(&query.json) {
            Ok(model) => model,
            Err(e) => {
                return DataResponse::error(
                    ResponseStatus::BadRequest,
                    format!("failed to parse query: {e}"),
                )
            }
        };

        if model.raw_hogql.is_empty() {
            return DataResponse::error(ResponseStatus::BadRequest, "empty HogQL query");
        }

        let hogql = expand_time_macros(&model.raw_hogql, &query.time_range);
        log_query!(self.log_config, &hogql, "executing HogQL query");

        let result = match self.executor.execute_hogql(&hogql).await {
            Ok(result) => result,
            Err(e) => {
                return DataResponse::error(
                    ResponseStatus::Internal,
                    format!("query execution failed: {e}"),
                )
            }
        };

        if let Some(upstream) = result.error_message() {
            warn!(error = %upstream, "query API reported an error alongside results");
        }

        match self.builder.build(&result) {
            Ok(frame) => {
                debug!(
                    columns = frame.column_count(),
                    rows = frame.row_count(),
                    "built frame"
                );
                DataResponse::from_frame(frame)
            }
            Err(e) => DataResponse::error(
                ResponseStatus::Internal,
                format!("failed to convert response: {e}"),
            ),
        }
    }

    /// Verifies the configuration and that PostHog answers a trivial query.
    #[instrument(skip(self))]
    pub async fn check_health(&self) -> HealthCheckResult {
        if self.secrets.api_key.is_empty() {
            return HealthCheckResult::error("API key is missing");
        }
        if self.settings.posthog_url.is_empty() {
            return HealthCheckResult::error("PostHog URL is missing");
        }
        if self.settings.project_id.is_empty() {
            return HealthCheckResult::error("Project ID is missing");
        }

        match self.executor.test_connection().await {
            Ok(()) => HealthCheckResult::ok("Successfully connected to PostHog"),
            Err(e) => HealthCheckResult::error(format!("Connection test failed: {e}")),
        }
    }
}
