//! Transport for the PostHog HogQL query API.
//!
//! [`QueryExecutor`] is the seam between the datasource and the network:
//! the datasource only needs something that turns query text into a
//! [`QueryResult`]. [`PostHogClient`] (feature `client`) is the HTTP
//! implementation.

mod error;
#[cfg(feature = "client")]
mod posthog;

pub use error::{ClientError, ClientResult};
#[cfg(feature = "client")]
pub use posthog::{HogQLQueryBody, HogQLRequest, PostHogClient, HOGQL_QUERY_KIND};

use async_trait::async_trait;

use crate::query::QueryResult;

/// Query used to check connectivity and credentials.
pub const CONNECTION_TEST_QUERY: &str = "SELECT 1";

/// Executes HogQL queries against PostHog.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs a query and returns the decoded response body.
    async fn execute_hogql(&self, query: &str) -> ClientResult<QueryResult>;

    /// Runs a trivial query to verify the endpoint and credentials.
    async fn test_connection(&self) -> ClientResult<()> {
        self.execute_hogql(CONNECTION_TEST_QUERY).await.map(|_| ())
    }
}
