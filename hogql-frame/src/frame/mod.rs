//! Strongly-typed, null-aware columnar frames.
//!
//! A [`Frame`] is the transcoder's output: an ordered list of [`Column`]s,
//! each holding values of exactly one [`ColumnCategory`]. Every slot is an
//! `Option`, so a null is never confused with a legitimate zero, `false` or
//! empty string.
//!
//! ## Example
//!
//! ```rust
//! use hogql_frame::frame::{CellValue, FrameBuilder};
//! use hogql_frame::query::QueryResult;
//! use serde_json::json;
//!
//! let result = QueryResult::new(
//!     vec!["event".into(), "total".into()],
//!     Some(json!(["String", "Int64"])),
//!     vec![vec![json!("page_view"), json!(42)], vec![json!("click")]],
//! );
//!
//! let frame = FrameBuilder::new().build(&result).unwrap();
//! assert_eq!(frame.row_count(), 2);
//! assert_eq!(frame.columns()[1].get(0), Some(CellValue::Real(42.0)));
//! assert_eq!(frame.columns()[1].get(1), None);
//! ```

mod builder;
pub mod coerce;
mod record_batch;

pub use builder::{transcode, FrameBuilder, DEFAULT_FRAME_NAME};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::ColumnCategory;

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Timestamp(DateTime<Utc>),
    Real(f64),
    Boolean(bool),
    Text(String),
}

impl CellValue {
    /// The category this value belongs to.
    pub fn category(&self) -> ColumnCategory {
        match self {
            Self::Timestamp(_) => ColumnCategory::Timestamp,
            Self::Real(_) => ColumnCategory::Real,
            Self::Boolean(_) => ColumnCategory::Boolean,
            Self::Text(_) => ColumnCategory::Text,
        }
    }
}

/// The typed storage of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum ColumnValues {
    Timestamp(Vec<Option<DateTime<Utc>>>),
    Real(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    /// Allocates `len` null slots for the given category.
    pub fn nulls(category: ColumnCategory, len: usize) -> Self {
        match category {
            ColumnCategory::Timestamp => Self::Timestamp(vec![None; len]),
            ColumnCategory::Real => Self::Real(vec![None; len]),
            ColumnCategory::Boolean => Self::Boolean(vec![None; len]),
            ColumnCategory::Text => Self::Text(vec![None; len]),
        }
    }

    pub fn category(&self) -> ColumnCategory {
        match self {
            Self::Timestamp(_) => ColumnCategory::Timestamp,
            Self::Real(_) => ColumnCategory::Real,
            Self::Boolean(_) => ColumnCategory::Boolean,
            Self::Text(_) => ColumnCategory::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Timestamp(v) => v.len(),
            Self::Real(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of null slots.
    pub fn null_count(&self) -> usize {
        match self {
            Self::Timestamp(v) => v.iter().filter(|x| x.is_none()).count(),
            Self::Real(v) => v.iter().filter(|x| x.is_none()).count(),
            Self::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
            Self::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Returns the value at `row`, or `None` if the slot is null or out of range.
    pub fn get(&self, row: usize) -> Option<CellValue> {
        match self {
            Self::Timestamp(v) => v.get(row).copied().flatten().map(CellValue::Timestamp),
            Self::Real(v) => v.get(row).copied().flatten().map(CellValue::Real),
            Self::Boolean(v) => v.get(row).copied().flatten().map(CellValue::Boolean),
            Self::Text(v) => v.get(row).cloned().flatten().map(CellValue::Text),
        }
    }

    /// Stores a coerced value at `row`.
    ///
    /// Returns false, leaving the slot untouched, if the row is out of range
    /// or the value belongs to a different category.
    pub fn set(&mut self, row: usize, value: CellValue) -> bool {
        let slot = match (self, value) {
            (Self::Timestamp(v), CellValue::Timestamp(t)) => v.get_mut(row).map(|s| *s = Some(t)),
            (Self::Real(v), CellValue::Real(f)) => v.get_mut(row).map(|s| *s = Some(f)),
            (Self::Boolean(v), CellValue::Boolean(b)) => v.get_mut(row).map(|s| *s = Some(b)),
            (Self::Text(v), CellValue::Text(text)) => v.get_mut(row).map(|s| *s = Some(text)),
            _ => None,
        };
        slot.is_some()
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    #[serde(flatten)]
    values: ColumnValues,
}

impl Column {
    /// Creates a column of `len` null slots.
    pub fn new(name: impl Into<String>, category: ColumnCategory, len: usize) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::nulls(category, len),
        }
    }

    /// Creates a column from already typed values.
    pub fn from_values(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ColumnCategory {
        self.values.category()
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<CellValue> {
        self.values.get(row)
    }

    pub(crate) fn values_mut(&mut self) -> &mut ColumnValues {
        &mut self.values
    }
}

/// An ordered set of typed columns aligned by row index.
///
/// Every column has exactly [`row_count`](Self::row_count) slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    name: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Frame {
    /// Creates a frame with no columns.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    pub(crate) fn from_columns(
        name: impl Into<String>,
        columns: Vec<Column>,
        row_count: usize,
    ) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == row_count));
        Self {
            name: name.into(),
            columns,
            row_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Consumes the frame, returning its columns.
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Returns the first column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
