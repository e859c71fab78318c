//! Tag decoding and row filtering
//!
//! Tags arrive as a JSON object encoded in a string. Rows whose tags cannot be
//! decoded never match a filter.

use serde_json::Value;
use tracing::debug;

use crate::models::{PointOfInterest, RawPoiRow, Tags};

/// Equality predicate on one tag, e.g. `amenity == "pub"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// `amenity == "pub"`
    #[must_use]
    pub fn pubs() -> Self {
        Self::new("amenity", "pub")
    }

    #[must_use]
    pub fn matches(&self, tags: &Tags) -> bool {
        tags.get(&self.key).is_some_and(|value| *value == self.value)
    }
}

/// Decode a tag string. `None` when it is not a JSON object.
#[must_use]
pub fn parse_tags(raw: &str) -> Option<Tags> {
    if raw == "{}" {
        return Some(Tags::new());
    }

    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(raw) else {
        return None;
    };

    let tags = object
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect();
    Some(tags)
}

/// Decode every row and keep those whose tags satisfy `predicate`
pub fn filter_rows<F>(rows: Vec<RawPoiRow>, predicate: F) -> Vec<PointOfInterest>
where
    F: Fn(&Tags) -> bool,
{
    rows.into_iter()
        .filter_map(|row| {
            let Some(tags) = parse_tags(&row.tags) else {
                debug!(id = row.id, "Skipping row with malformed tags");
                return None;
            };
            predicate(&tags).then_some(PointOfInterest {
                id: row.id,
                lat: row.lat,
                lon: row.lon,
                tags,
            })
        })
        .collect()
}
