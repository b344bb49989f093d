//! Column schema resolution for HogQL results.
//!
//! PostHog describes each result column with a ClickHouse type name such as
//! `Nullable(DateTime64(6, 'UTC'))` or `UInt64`. This module turns those
//! names into one of the four [`ColumnCategory`] values a frame can hold:
//!
//! - [`normalize_type`] lowercases a tag and peels one `Nullable(...)` wrapper
//! - [`TypeTags`] decodes the response's `types` field, which comes in two shapes
//! - [`ColumnCategory::classify`] applies the substring rules
//!
//! ```rust
//! use hogql_frame::schema::{ColumnCategory, TypeTags};
//! use serde_json::json;
//!
//! let tags = TypeTags::decode(Some(&json!([["Nullable(DateTime)", "DateTime"]]))).unwrap();
//! let categories: Vec<_> = tags
//!     .dialect_types()
//!     .iter()
//!     .map(|tag| ColumnCategory::from_type_tag(tag))
//!     .collect();
//! assert_eq!(categories, vec![ColumnCategory::Timestamp]);
//! ```

mod category;
mod normalize;
mod type_tags;

pub use category::ColumnCategory;
pub use normalize::normalize_type;
pub use type_tags::TypeTags;
