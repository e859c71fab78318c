//! Ranked pubs and the vibe match built on top of them

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{Location, PointOfInterest, Tags};

/// Keys that belong to the fixed pub schema and are never copied from tags.
pub const RESERVED_KEYS: [&str; 7] = [
    "name",
    "distance",
    "distance_value",
    "coordinates",
    "id",
    "explanation",
    "note",
];

/// A point of interest with its distance from the query point
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPub {
    pub id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Kilometres from the query point, infinite without coordinates
    pub distance_km: f64,
    pub tags: Tags,
}

impl RankedPub {
    #[must_use]
    pub fn from_poi(poi: PointOfInterest, distance_km: f64) -> Self {
        let name = poi
            .tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| format!("Unnamed Pub (ID: {})", poi.id));

        Self {
            id: poi.id,
            name,
            latitude: poi.lat,
            longitude: poi.lon,
            distance_km,
            tags: poi.tags,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Location> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
            _ => None,
        }
    }

    /// Distance as shown to users, e.g. `0.42 km`
    #[must_use]
    pub fn formatted_distance(&self) -> String {
        format!("{:.2} km", self.distance_km)
    }

    /// Tags passed through to the display layer
    pub fn extra_tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl Serialize for RankedPub {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("distance", &self.formatted_distance())?;
        map.serialize_entry("distance_value", &self.distance_km)?;
        map.serialize_entry("coordinates", &[self.latitude, self.longitude])?;
        map.serialize_entry("id", &self.id)?;
        for (key, value) in self.extra_tags() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The pub chosen for a vibe, always populated
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VibeMatchResult {
    #[serde(flatten)]
    pub venue: RankedPub,
    pub explanation: String,
    /// Set when the model named a pub we could not find
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl VibeMatchResult {
    #[must_use]
    pub fn new(venue: RankedPub, explanation: impl Into<String>) -> Self {
        Self {
            venue,
            explanation: explanation.into(),
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn poi(id: i64, tags: &[(&str, &str)]) -> PointOfInterest {
        PointOfInterest {
            id,
            lat: Some(51.22),
            lon: Some(4.40),
            tags: tags
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let ranked = RankedPub::from_poi(poi(42, &[("amenity", "pub")]), 1.0);
        assert_eq!(ranked.name, "Unnamed Pub (ID: 42)");
    }

    #[test]
    fn test_serializes_like_pub_listing() {
        let ranked = RankedPub::from_poi(
            poi(
                3,
                &[("amenity", "pub"), ("name", "De Kroon"), ("id", "bogus")],
            ),
            0.456,
        );
        let value = serde_json::to_value(&ranked).unwrap();

        assert_eq!(value["name"], "De Kroon");
        assert_eq!(value["distance"], "0.46 km");
        assert_eq!(value["distance_value"], json!(0.456));
        assert_eq!(value["coordinates"], json!([51.22, 4.40]));
        assert_eq!(value["id"], 3);
        assert_eq!(value["amenity"], "pub");
    }

    #[test]
    fn test_extra_tags_follow_dataset_order() {
        let ranked = RankedPub::from_poi(
            poi(
                4,
                &[("wheelchair", "yes"), ("amenity", "pub"), ("name", "Kulminator"), ("brewery", "various")],
            ),
            0.2,
        );
        let json = serde_json::to_string(&ranked).unwrap();
        let wheelchair = json.find("\"wheelchair\"").unwrap();
        let amenity = json.find("\"amenity\"").unwrap();
        let brewery = json.find("\"brewery\"").unwrap();
        assert!(wheelchair < amenity && amenity < brewery, "{json}");
    }

    #[test]
    fn test_infinite_distance_serializes_as_null() {
        let mut source = poi(5, &[]);
        source.lat = None;
        let ranked = RankedPub::from_poi(source, f64::INFINITY);
        let value = serde_json::to_value(&ranked).unwrap();

        assert!(value["distance_value"].is_null());
        assert_eq!(value["distance"], "inf km");
        assert_eq!(value["coordinates"], json!([null, 4.40]));
    }

    #[test]
    fn test_match_result_flattens_pub() {
        let ranked = RankedPub::from_poi(poi(9, &[("name", "Oud Arsenaal")]), 0.1);
        let result = VibeMatchResult::new(ranked, "Cozy").with_note("check this");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["name"], "Oud Arsenaal");
        assert_eq!(value["explanation"], "Cozy");
        assert_eq!(value["note"], "check this");
    }

    #[test]
    fn test_match_result_omits_missing_note() {
        let ranked = RankedPub::from_poi(poi(9, &[("name", "Oud Arsenaal")]), 0.1);
        let value = serde_json::to_value(VibeMatchResult::new(ranked, "Cozy")).unwrap();
        assert!(value.get("note").is_none());
    }
}
