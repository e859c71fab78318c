//! Point-of-interest records as they come out of the dataset

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Location;

/// OpenStreetMap-style tag mapping, in dataset order
pub type Tags = IndexMap<String, String>;

/// A dataset row before its tag string has been decoded
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPoiRow {
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// JSON-encoded tag object
    #[serde(default)]
    pub tags: String,
}

/// Immutable snapshot record with decoded tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tags: Tags,
}

impl PointOfInterest {
    /// Coordinates, when both halves are present
    #[must_use]
    pub fn coordinates(&self) -> Option<Location> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
            _ => None,
        }
    }

    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
