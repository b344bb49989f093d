//! The HogQL query API response model.
//!
//! Only the fields the transcoder needs are modelled; everything else in the
//! body (timings, the generated ClickHouse SQL, pagination hints) is ignored.
//! The `types` field is kept raw because its shape is only resolved during
//! transcoding, see [`TypeTags`](crate::schema::TypeTags).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::schema::TypeTags;

/// A decoded response body from `POST /api/projects/{id}/query/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names, in result order. Not necessarily unique.
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<String>,

    /// The raw `types` field, in either wire shape.
    #[serde(
        default,
        rename = "types",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_tags: Option<Value>,

    /// Result rows. Rows may be shorter or longer than `columns`.
    #[serde(default, rename = "results", deserialize_with = "null_as_default")]
    pub rows: Vec<Vec<Value>>,

    /// Upstream error message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Upstream error detail, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl QueryResult {
    /// Creates a result from columns, a raw `types` field and rows.
    pub fn new(columns: Vec<String>, type_tags: Option<Value>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            type_tags,
            rows,
            error: None,
            detail: None,
        }
    }

    /// Decodes a response body.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Decodes the `types` field.
    pub fn decode_type_tags(&self) -> Result<TypeTags> {
        TypeTags::decode(self.type_tags.as_ref())
    }

    /// Number of result rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The upstream `error` message, if one was sent and is non-empty.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|s| !s.is_empty())
    }

    /// The upstream `detail` message, if one was sent and is non-empty.
    pub fn detail_message(&self) -> Option<&str> {
        self.detail.as_deref().filter(|s| !s.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
