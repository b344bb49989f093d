//! Time-range macro substitution for HogQL query text.
//!
//! Dashboards write queries such as
//! `SELECT ... WHERE timestamp >= $__timeFrom AND timestamp < $__timeTo`;
//! the placeholders are replaced with quoted UTC literals before the query
//! is sent.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for the start of the dashboard time range.
pub const TIME_FROM_MACRO: &str = "$__timeFrom";

/// Placeholder for the end of the dashboard time range.
pub const TIME_TO_MACRO: &str = "$__timeTo";

const LITERAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A dashboard time range, held in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a range from instants in any timezone.
    pub fn new<Tz: TimeZone>(from: DateTime<Tz>, to: DateTime<Tz>) -> Self {
        Self {
            from: from.with_timezone(&Utc),
            to: to.with_timezone(&Utc),
        }
    }
}

/// Replaces `$__timeFrom` and `$__timeTo` with quoted
/// `'YYYY-MM-DD HH:MM:SS'` literals of the range bounds.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use hogql_frame::macros::{expand_time_macros, TimeRange};
///
/// let range = TimeRange::new(
///     Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 1, 16, 10, 30, 0).unwrap(),
/// );
/// assert_eq!(
///     expand_time_macros("WHERE timestamp >= $__timeFrom", &range),
///     "WHERE timestamp >= '2024-01-15 10:30:00'"
/// );
/// ```
pub fn expand_time_macros(query: &str, range: &TimeRange) -> String {
    query
        .replace(TIME_FROM_MACRO, &quoted(&range.from))
        .replace(TIME_TO_MACRO, &quoted(&range.to))
}

fn quoted(ts: &DateTime<Utc>) -> String {
    format!("'{}'", ts.format(LITERAL_FORMAT))
}
