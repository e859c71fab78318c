//! Nearest-pub ranking
//!
//! Attaches a distance to every candidate, stable-sorts by it and keeps the
//! closest `n`. Candidates without coordinates sort last.

use crate::geo;
use crate::models::{Location, PointOfInterest, RankedPub};

/// Number of pubs returned when the caller does not say otherwise
pub const DEFAULT_TOP_N: usize = 5;

/// Rank candidates by distance from `query` and keep the first `n`
#[must_use]
pub fn rank(candidates: Vec<PointOfInterest>, query: &Location, n: usize) -> Vec<RankedPub> {
    let mut ranked: Vec<RankedPub> = candidates
        .into_iter()
        .map(|poi| {
            let distance = geo::distance_or_infinity(query, poi.coordinates());
            RankedPub::from_poi(poi, distance)
        })
        .collect();

    // sort_by is stable, so equal distances keep dataset order
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(n);
    ranked
}
