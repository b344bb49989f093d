const NULLABLE_PREFIX: &str = "nullable(";

/// Canonicalizes a ClickHouse type tag.
///
/// The tag is lowercased and a single outer `Nullable(...)` wrapper is
/// removed. Nested wrappers are left in place, so `Nullable(Nullable(Int8))`
/// normalizes to `nullable(int8)`.
///
/// ```rust
/// use hogql_frame::schema::normalize_type;
///
/// assert_eq!(normalize_type("Nullable(Float64)"), "float64");
/// assert_eq!(normalize_type("DateTime"), "datetime");
/// ```
pub fn normalize_type(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    match lowered
        .strip_prefix(NULLABLE_PREFIX)
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => inner.to_string(),
        None => lowered,
    }
}
