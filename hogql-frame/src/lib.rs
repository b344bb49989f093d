//! # hogql-frame - typed frames from PostHog HogQL results
//!
//! PostHog's query API answers a HogQL query with a schemaless table: a list
//! of column names, a list of ClickHouse type names, and rows of untyped
//! JSON values. Charting and tabular display need the opposite: one
//! consistent value type per column and null-aware, positionally aligned
//! values. This crate does that transcoding.
//!
//! ## Quick Start
//!
//! ```rust
//! use hogql_frame::prelude::*;
//!
//! # fn main() -> hogql_frame::error::Result<()> {
//! let body = br#"{
//!     "columns": ["day", "pageviews", "path"],
//!     "types": [["Date", "Date"], ["UInt64", "UInt64"], ["Nullable(String)", "String"]],
//!     "results": [["2024-01-15", "1204", "/pricing"], ["2024-01-16", 988, null]]
//! }"#;
//!
//! let result = QueryResult::from_json(body)?;
//! let frame = transcode(&result)?;
//!
//! assert_eq!(frame.column_count(), 3);
//! assert_eq!(frame.columns()[0].category(), ColumnCategory::Timestamp);
//! assert_eq!(frame.columns()[1].get(0), Some(CellValue::Real(1204.0)));
//! assert_eq!(frame.columns()[2].get(1), None);
//!
//! // Hand the frame to anything that speaks Arrow
//! let batch = frame.to_record_batch()?;
//! assert_eq!(batch.num_rows(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## How columns are typed
//!
//! Each column's type tag is lowercased, stripped of one `Nullable(...)`
//! wrapper and classified by substring into one of four categories:
//! timestamp, real, boolean or text. Cells are then coerced individually.
//! A cell that cannot be coerced (an unparseable date, a non-numeric string
//! in a numeric column) becomes null rather than failing the query; the only
//! error transcoding can return is a `types` field in an unknown shape.
//!
//! ## Architecture
//!
//! - **`schema`**: type tag normalization, decoding and classification
//! - **`frame`**: the typed frame model, value coercion, the frame builder
//!   and Arrow export
//! - **`query`**: the query API response model
//! - **`macros`**: `$__timeFrom` / `$__timeTo` substitution
//! - **`client`**: the `QueryExecutor` seam and the PostHog HTTP client
//! - **`datasource`**: dashboard-host query and health-check handlers
//! - **`config`**, **`security`**, **`logging`**, **`error`**: ambient plumbing
//!
//! ## Features
//!
//! - `client` (default): the `reqwest`-based [`client::PostHogClient`]

pub mod client;
pub mod config;
pub mod datasource;
pub mod error;
pub mod frame;
pub mod logging;
pub mod macros;
pub mod prelude;
pub mod query;
pub mod schema;
pub mod security;
