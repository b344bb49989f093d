//! Per-cell value coercion.
//!
//! Coercion is total: every function here returns `None` instead of failing,
//! so one malformed cell can never take down a whole query result.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::CellValue;
use crate::schema::ColumnCategory;

/// Datetime layouts tried, in order, for text in timestamp columns.
///
/// A fractional second is optional after the seconds field of the first two
/// layouts. The third requires exactly three fractional digits followed by `Z`.
pub const DATETIME_LAYOUTS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S.%3fZ",
];

/// Date-only layout, tried last. Midnight UTC is implied.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

/// Coerces a raw cell into the given category.
///
/// A null raw value always yields `None`.
pub fn coerce(category: ColumnCategory, raw: &Value) -> Option<CellValue> {
    match category {
        ColumnCategory::Timestamp => to_timestamp(raw).map(CellValue::Timestamp),
        ColumnCategory::Real => to_real(raw).map(CellValue::Real),
        ColumnCategory::Boolean => to_boolean(raw).map(CellValue::Boolean),
        ColumnCategory::Text => to_text(raw).map(CellValue::Text),
    }
}

/// Text is parsed against [`DATETIME_LAYOUTS`] then [`DATE_LAYOUT`]. Failing
/// that, numbers and numeric strings are read as Unix epoch seconds
/// (fractions truncated).
pub fn to_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    if let Value::String(text) = raw {
        if let Some(ts) = parse_timestamp_text(text) {
            return Some(ts);
        }
    }

    let seconds = to_real(raw)?;
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(seconds.trunc() as i64, 0)
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_LAYOUT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Numbers are taken as-is. Strings must parse as a finite decimal number in
/// their entirety, ignoring surrounding whitespace; PostHog encodes some
/// numeric aggregates as JSON strings. `NaN` and infinities are null.
pub fn to_real(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Booleans are taken as-is; numbers map zero to `false` and anything else
/// to `true`. Strings are not interpreted.
pub fn to_boolean(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

/// Renders any non-null value as text. Numbers keep their JSON rendering, so
/// an integral float stays `42.0`. Arrays and objects render as compact JSON.
pub fn to_text(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
