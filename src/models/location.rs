//! Location model for the user's query point

use serde::{Deserialize, Serialize};

use crate::VibeFinderError;

/// Query coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a location from already-numeric input, checking ranges
    pub fn validated(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(VibeFinderError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(VibeFinderError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self::new(latitude, longitude))
    }

    /// Parse form-style text coordinates
    pub fn parse(latitude: &str, longitude: &str) -> crate::Result<Self> {
        let lat = parse_coordinate("latitude", latitude)?;
        let lon = parse_coordinate("longitude", longitude)?;
        Self::validated(lat, lon)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Parse one coordinate field, naming the field in the error
pub fn parse_coordinate(field: &str, raw: &str) -> crate::Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        VibeFinderError::validation(format!("{field} must be a number, got: '{raw}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_coordinates() {
        let location = Location::parse("51.2271", " 4.4132 ").unwrap();
        assert_eq!(location.latitude, 51.2271);
        assert_eq!(location.longitude, 4.4132);
    }

    #[test]
    fn test_parse_non_numeric_latitude() {
        let err = Location::parse("north", "4.4").unwrap_err();
        assert!(matches!(err, VibeFinderError::Validation { .. }));
        assert!(err.to_string().contains("latitude"));
        assert!(err.to_string().contains("north"));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Location::validated(91.0, 4.0).is_err());
        assert!(Location::validated(51.0, -181.0).is_err());
        assert!(Location::validated(f64::NAN, 4.0).is_err());
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(51.227_123, 4.413_289);
        assert_eq!(location.format_coordinates(), "51.2271, 4.4133");
    }
}
