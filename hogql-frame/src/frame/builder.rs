use tracing::{debug, instrument, trace};

use super::coerce::coerce;
use super::{Column, Frame};
use crate::error::Result;
use crate::query::QueryResult;
use crate::schema::ColumnCategory;

/// Name given to frames built without an explicit name.
pub const DEFAULT_FRAME_NAME: &str = "response";

/// Builds typed frames from HogQL query results.
///
/// Building is synchronous and allocation-bounded by the result size. The
/// builder holds no state between calls, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    name: String,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self {
            name: DEFAULT_FRAME_NAME.to_string(),
        }
    }
}

impl FrameBuilder {
    /// Creates a builder producing frames named [`DEFAULT_FRAME_NAME`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of produced frames.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Resolves the category of every column.
    ///
    /// Columns without a type entry are [`ColumnCategory::Text`].
    pub fn classify_columns(&self, result: &QueryResult) -> Result<Vec<ColumnCategory>> {
        let type_tags = result.decode_type_tags()?.into_dialect_types();

        Ok((0..result.columns.len())
            .map(|idx| {
                type_tags
                    .get(idx)
                    .map(|tag| ColumnCategory::from_type_tag(tag))
                    .unwrap_or_default()
            })
            .collect())
    }

    /// Transcodes a query result into a frame.
    ///
    /// Every column of the returned frame holds exactly one slot per result
    /// row. Short rows leave their trailing slots null and values beyond the
    /// last column are dropped. Cells that cannot be coerced are null.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::MalformedTypeTags`](crate::error::FrameError::MalformedTypeTags)
    /// if the `types` field matches neither wire shape. Nothing else fails.
    #[instrument(
        skip(self, result),
        fields(columns = result.columns.len(), rows = result.rows.len())
    )]
    pub fn build(&self, result: &QueryResult) -> Result<Frame> {
        let categories = self.classify_columns(result)?;

        if result.columns.is_empty() {
            debug!("query result has no columns");
            return Ok(Frame::empty(self.name.clone()));
        }

        let row_count = result.rows.len();
        let mut columns: Vec<Column> = result
            .columns
            .iter()
            .zip(&categories)
            .map(|(name, category)| {
                debug!(column = %name, category = %category, "classified column");
                Column::new(name.clone(), *category, row_count)
            })
            .collect();

        let mut misses = 0usize;
        for (row_idx, row) in result.rows.iter().enumerate() {
            if row.len() > columns.len() {
                trace!(
                    row = row_idx,
                    dropped = row.len() - columns.len(),
                    "dropping values beyond the last column"
                );
            }

            for (column, raw) in columns.iter_mut().zip(row) {
                match coerce(column.category(), raw) {
                    Some(value) => {
                        column.values_mut().set(row_idx, value);
                    }
                    None if !raw.is_null() => misses += 1,
                    None => {}
                }
            }
        }

        if misses > 0 {
            debug!(misses, "cells could not be coerced and were left null");
        }

        Ok(Frame::from_columns(self.name.clone(), columns, row_count))
    }
}

/// Transcodes a query result with a default [`FrameBuilder`].
pub fn transcode(result: &QueryResult) -> Result<Frame> {
    FrameBuilder::default().build(result)
}
