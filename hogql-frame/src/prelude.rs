//! Prelude for commonly used types and traits in hogql-frame.

pub use crate::client::{ClientError, ClientResult, QueryExecutor};
pub use crate::config::{ClientConfig, DatasourceSecrets, DatasourceSettings};
pub use crate::datasource::PostHogDatasource;
pub use crate::error::{ErrorContext, FrameError, Result};
pub use crate::frame::{transcode, CellValue, Column, ColumnValues, Frame, FrameBuilder};
pub use crate::logging::LogConfig;
pub use crate::macros::{expand_time_macros, TimeRange};
pub use crate::query::QueryResult;
pub use crate::schema::{normalize_type, ColumnCategory, TypeTags};

#[cfg(feature = "client")]
pub use crate::client::PostHogClient;
