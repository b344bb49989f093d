use serde::{Deserialize, Serialize};

use super::normalize_type;

/// The semantic value kind of a frame column.
///
/// Every ClickHouse type tag collapses into one of these four categories.
/// Unknown or missing tags fall back to [`ColumnCategory::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnCategory {
    /// UTC instants
    Timestamp,
    /// 64-bit floating point numbers (all integer, float and decimal types)
    Real,
    /// Booleans
    Boolean,
    /// Strings, and anything that is not recognized
    #[default]
    Text,
}

impl ColumnCategory {
    /// Classifies an already normalized type tag.
    ///
    /// Rules are substring matches checked in a fixed order, first match wins:
    ///
    /// 1. `datetime` or `date` → [`Timestamp`](Self::Timestamp)
    /// 2. `float` or `decimal` → [`Real`](Self::Real)
    /// 3. `int` or `uint` → [`Real`](Self::Real)
    /// 4. `bool` → [`Boolean`](Self::Boolean)
    /// 5. anything else → [`Text`](Self::Text)
    ///
    /// Matching on substrings lets parametrized spellings such as
    /// `decimal(18, 4)` or `datetime64(3, 'utc')` classify without a type table.
    /// It also means any tag containing `int` (`interval`, `point`) is `Real`;
    /// callers rely on that, so the order must not change.
    pub fn classify(normalized: &str) -> Self {
        let contains_any = |needles: &[&str]| needles.iter().any(|n| normalized.contains(n));

        if contains_any(&["datetime", "date"]) {
            Self::Timestamp
        } else if contains_any(&["float", "decimal"]) || contains_any(&["int", "uint"]) {
            Self::Real
        } else if normalized.contains("bool") {
            Self::Boolean
        } else {
            Self::Text
        }
    }

    /// Normalizes and classifies a raw type tag.
    pub fn from_type_tag(raw: &str) -> Self {
        Self::classify(&normalize_type(raw))
    }

    /// Returns the category name as used in serialized frames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ColumnCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
