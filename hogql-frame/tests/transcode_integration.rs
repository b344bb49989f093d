//! End-to-end transcoding of query API bodies.

use arrow::array::Array;
use chrono::{TimeZone, Utc};
use hogql_frame::frame::{transcode, CellValue, FrameBuilder};
use hogql_frame::query::QueryResult;
use hogql_frame::schema::ColumnCategory;

fn body(json: serde_json::Value) -> QueryResult {
    QueryResult::from_json(json.to_string().as_bytes()).unwrap()
}

#[test]
fn test_events_over_time() {
    let result = body(serde_json::json!({
        "columns": ["timestamp", "count", "event"],
        "types": ["DateTime", "Int64", "String"],
        "results": [
            ["2024-01-15 10:30:00", 42, "page_view"],
            ["2024-01-15 11:00:00", 17, "click"]
        ]
    }));

    let frame = transcode(&result).unwrap();

    assert_eq!(frame.column_count(), 3);
    let names: Vec<_> = frame.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, ["timestamp", "count", "event"]);
    assert!(frame.columns().iter().all(|c| c.len() == 2));

    assert_eq!(frame.columns()[1].get(0), Some(CellValue::Real(42.0)));
    assert_eq!(
        frame.columns()[2].get(0),
        Some(CellValue::Text("page_view".to_string()))
    );
    assert_eq!(
        frame.columns()[0].get(0),
        Some(CellValue::Timestamp(
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        ))
    );
}

#[test]
fn test_paired_types_from_current_api() {
    let result = body(serde_json::json!({
        "columns": ["day", "users", "ratio", "is_active", "props"],
        "types": [
            ["Nullable(Date)", "Date"],
            ["UInt64", "UInt64"],
            ["Nullable(Float64)", "Float"],
            ["Bool", "Boolean"],
            ["Map(String, String)", "Unknown"]
        ],
        "results": [
            ["2024-01-15", "1204", 0.25, true, {"plan": "free"}],
            ["2024-01-16T00:00:00.000Z", 988, null, 0, {}],
            [1705363200, null, "0.5", 1, "raw"]
        ],
        "hogql": "SELECT ...",
        "timings": []
    }));

    let frame = FrameBuilder::new().with_name("A").build(&result).unwrap();
    let categories: Vec<_> = frame.columns().iter().map(|c| c.category()).collect();
    assert_eq!(
        categories,
        [
            ColumnCategory::Timestamp,
            ColumnCategory::Real,
            ColumnCategory::Real,
            ColumnCategory::Boolean,
            ColumnCategory::Text,
        ]
    );

    let day = frame.column("day").unwrap();
    assert_eq!(
        day.get(1),
        Some(CellValue::Timestamp(
            Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap()
        ))
    );
    assert_eq!(day.get(2), day.get(1));

    let users = frame.column("users").unwrap();
    assert_eq!(users.get(0), Some(CellValue::Real(1204.0)));
    assert_eq!(users.get(2), None);

    let ratio = frame.column("ratio").unwrap();
    assert_eq!(ratio.get(1), None);
    assert_eq!(ratio.get(2), Some(CellValue::Real(0.5)));

    let active = frame.column("is_active").unwrap();
    assert_eq!(active.get(1), Some(CellValue::Boolean(false)));
    assert_eq!(active.get(2), Some(CellValue::Boolean(true)));

    let props = frame.column("props").unwrap();
    assert_eq!(
        props.get(0),
        Some(CellValue::Text(r#"{"plan":"free"}"#.to_string()))
    );
    assert_eq!(props.get(2), Some(CellValue::Text("raw".to_string())));
}

#[test]
fn test_ragged_rows() {
    let result = body(serde_json::json!({
        "columns": ["a", "b"],
        "types": ["String", "String"],
        "results": [["x"], [], ["y", "z", "extra", "more"]]
    }));

    let frame = transcode(&result).unwrap();
    assert_eq!(frame.row_count(), 3);

    let a = &frame.columns()[0];
    let b = &frame.columns()[1];
    assert_eq!(a.get(0), Some(CellValue::Text("x".to_string())));
    assert_eq!(b.get(0), None);
    assert_eq!(a.get(1), None);
    assert_eq!(b.get(1), None);
    assert_eq!(b.get(2), Some(CellValue::Text("z".to_string())));
}

#[test]
fn test_missing_and_short_types() {
    let result = body(serde_json::json!({
        "columns": ["n", "m"],
        "types": ["Int8"],
        "results": [[1, 2]]
    }));
    let frame = transcode(&result).unwrap();
    assert_eq!(frame.columns()[0].category(), ColumnCategory::Real);
    assert_eq!(frame.columns()[1].category(), ColumnCategory::Text);
    assert_eq!(
        frame.columns()[1].get(0),
        Some(CellValue::Text("2".to_string()))
    );

    let result = body(serde_json::json!({
        "columns": ["n"],
        "results": [[1]]
    }));
    let frame = transcode(&result).unwrap();
    assert_eq!(frame.columns()[0].category(), ColumnCategory::Text);
}

#[test]
fn test_empty_columns() {
    let result = body(serde_json::json!({
        "columns": [],
        "types": [],
        "results": [[1, 2, 3]]
    }));
    let frame = transcode(&result).unwrap();
    assert_eq!(frame.column_count(), 0);
}

#[test]
fn test_malformed_types_fail_whole_result() {
    let result = body(serde_json::json!({
        "columns": ["a"],
        "types": "String",
        "results": [["x"]]
    }));
    let err = transcode(&result).unwrap_err();
    assert!(err.is_malformed_type_tags());
    assert!(err.to_string().starts_with("unexpected types format"));
}

#[test]
fn test_arrow_export_matches_frame() {
    let result = body(serde_json::json!({
        "columns": ["t", "v"],
        "types": [["DateTime64(3, 'UTC')", "DateTime"], ["Decimal(10, 2)", "Float"]],
        "results": [["2024-01-15T10:30:00", "12.50"], [null, "oops"]]
    }));
    let frame = transcode(&result).unwrap();
    let batch = frame.to_record_batch().unwrap();

    assert_eq!(batch.num_rows(), frame.row_count());
    assert_eq!(batch.num_columns(), frame.column_count());
    assert_eq!(batch.column(0).null_count(), 1);
    assert_eq!(batch.column(1).null_count(), 1);
}
