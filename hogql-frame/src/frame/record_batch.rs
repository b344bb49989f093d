//! Arrow export for frames.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use super::{Column, ColumnValues, Frame};
use crate::error::Result;
use crate::schema::ColumnCategory;

const UTC: &str = "UTC";

impl ColumnCategory {
    /// The Arrow type frames use for this category.
    pub fn arrow_data_type(&self) -> DataType {
        match self {
            Self::Timestamp => DataType::Timestamp(TimeUnit::Millisecond, Some(UTC.into())),
            Self::Real => DataType::Float64,
            Self::Boolean => DataType::Boolean,
            Self::Text => DataType::Utf8,
        }
    }
}

impl Column {
    /// The nullable Arrow field describing this column.
    pub fn arrow_field(&self) -> Field {
        Field::new(self.name(), self.category().arrow_data_type(), true)
    }

    /// Copies the column into an Arrow array.
    pub fn to_arrow_array(&self) -> ArrayRef {
        match self.values() {
            ColumnValues::Timestamp(values) => Arc::new(
                TimestampMillisecondArray::from(
                    values
                        .iter()
                        .map(|ts| ts.map(|ts| ts.timestamp_millis()))
                        .collect::<Vec<_>>(),
                )
                .with_timezone(UTC),
            ),
            ColumnValues::Real(values) => Arc::new(Float64Array::from(values.clone())),
            ColumnValues::Boolean(values) => Arc::new(BooleanArray::from(values.clone())),
            ColumnValues::Text(values) => Arc::new(
                values
                    .iter()
                    .map(|s| s.as_deref())
                    .collect::<StringArray>(),
            ),
        }
    }
}

impl Frame {
    /// The Arrow schema of this frame. Duplicate column names are kept.
    pub fn schema(&self) -> SchemaRef {
        Arc::new(Schema::new(
            self.columns()
                .iter()
                .map(Column::arrow_field)
                .collect::<Vec<_>>(),
        ))
    }

    /// Converts the frame into a single Arrow record batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let arrays = self
            .columns()
            .iter()
            .map(Column::to_arrow_array)
            .collect::<Vec<_>>();
        let options = RecordBatchOptions::new().with_row_count(Some(self.row_count()));

        Ok(RecordBatch::try_new_with_options(
            self.schema(),
            arrays,
            &options,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::transcode;
    use crate::query::QueryResult;
    use arrow::array::Array;
    use serde_json::json;

    #[test]
    fn test_record_batch_types_and_nulls() {
        let result = QueryResult::new(
            vec![
                "time".to_string(),
                "value".to_string(),
                "flag".to_string(),
                "label".to_string(),
            ],
            Some(json!(["DateTime", "Float64", "Bool", "String"])),
            vec![
                vec![json!("2024-01-15 10:30:00"), json!(1.5), json!(true), json!("a")],
                vec![json!(null), json!(null), json!(null), json!(null)],
            ],
        );
        let batch = transcode(&result).unwrap().to_record_batch().unwrap();

        assert_eq!(batch.num_columns(), 4);
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(
            batch.schema().field(0).data_type(),
            &DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into()))
        );
        assert_eq!(batch.schema().field(3).data_type(), &DataType::Utf8);
        assert!(batch.schema().fields().iter().all(|f| f.is_nullable()));

        let time = batch
            .column(0)
            .as_any()
            .downcast_ref::<TimestampMillisecondArray>()
            .unwrap();
        assert_eq!(time.value(0), 1_705_314_600_000);

        let value = batch
            .column(1)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(value.value(0), 1.5);

        for column in batch.columns() {
            assert!(column.is_null(1));
            assert_eq!(column.null_count(), 1);
        }
    }

    #[test]
    fn test_zero_column_frame() {
        let batch = Frame::empty("response").to_record_batch().unwrap();
        assert_eq!(batch.num_columns(), 0);
        assert_eq!(batch.num_rows(), 0);
    }

    #[test]
    fn test_duplicate_column_names() {
        let result = QueryResult::new(
            vec!["x".to_string(), "x".to_string()],
            Some(json!(["Int8", "String"])),
            vec![vec![json!(1), json!("one")]],
        );
        let batch = transcode(&result).unwrap().to_record_batch().unwrap();
        assert_eq!(batch.schema().field(0).name(), "x");
        assert_eq!(batch.schema().field(1).name(), "x");
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Utf8);
    }
}
