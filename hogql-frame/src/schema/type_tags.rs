use serde::Deserialize;
use serde_json::Value;

use crate::error::{FrameError, Result};

/// The decoded `types` field of a HogQL response.
///
/// PostHog has shipped two incompatible encodings of the same information:
///
/// - flat: `["String", "Int64"]`
/// - paired: `[["String", "String"], ["Int64", "Int64"]]`, where the first
///   element of each pair is the ClickHouse type and the second is PostHog's
///   own name for it
///
/// Null entries are tolerated in both shapes and decode as empty (unknown)
/// type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTags {
    /// One type name per column.
    Flat(Vec<String>),
    /// One `[clickhouse_type, posthog_type, ...]` sequence per column.
    Paired(Vec<Vec<String>>),
}

impl Default for TypeTags {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl TypeTags {
    /// Decodes the raw `types` field.
    ///
    /// The flat shape is tried first, then the paired shape. An absent or
    /// `null` field decodes to an empty flat list. Anything else is a
    /// [`FrameError::MalformedTypeTags`].
    pub fn decode(raw: Option<&Value>) -> Result<Self> {
        let raw = match raw {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(raw) => raw,
        };

        if let Ok(flat) = Vec::<Option<String>>::deserialize(raw) {
            return Ok(Self::Flat(
                flat.into_iter().map(Option::unwrap_or_default).collect(),
            ));
        }

        if let Ok(paired) = Vec::<Option<Vec<Option<String>>>>::deserialize(raw) {
            return Ok(Self::Paired(
                paired
                    .into_iter()
                    .map(|pair| {
                        pair.unwrap_or_default()
                            .into_iter()
                            .map(Option::unwrap_or_default)
                            .collect()
                    })
                    .collect(),
            ));
        }

        Err(FrameError::malformed_type_tags(raw))
    }

    /// Returns the authoritative type name for every column, in order.
    ///
    /// For the paired shape this is element 0 of each pair; an empty pair
    /// yields an empty string.
    pub fn dialect_types(&self) -> Vec<String> {
        match self {
            Self::Flat(types) => types.clone(),
            Self::Paired(pairs) => pairs
                .iter()
                .map(|pair| pair.first().cloned().unwrap_or_default())
                .collect(),
        }
    }

    /// Consumes the tags, returning the authoritative type names.
    pub fn into_dialect_types(self) -> Vec<String> {
        match self {
            Self::Flat(types) => types,
            Self::Paired(pairs) => pairs
                .into_iter()
                .map(|pair| pair.into_iter().next().unwrap_or_default())
                .collect(),
        }
    }

    /// Number of decoded entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(types) => types.len(),
            Self::Paired(pairs) => pairs.len(),
        }
    }

    /// Returns true if no type entries were decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the wire shape, for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Flat(_) => "flat",
            Self::Paired(_) => "paired",
        }
    }
}
