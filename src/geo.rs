//! Great-circle distance between query points and pubs

use crate::models::Location;

/// Haversine distance in kilometres (Earth radius 6371 km)
#[must_use]
pub fn distance_km(from: &Location, to: &Location) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        haversine::Location {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        haversine::Units::Kilometers,
    )
}

/// Distance to an optional point; missing coordinates are infinitely far away
#[must_use]
pub fn distance_or_infinity(from: &Location, to: Option<Location>) -> f64 {
    to.map_or(f64::INFINITY, |to| distance_km(from, &to))
}
