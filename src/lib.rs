//! Vibe Beer Finder - find the pub near you that matches your vibe
//!
//! Loads OpenStreetMap points of interest, keeps the pubs, ranks them by
//! distance from the user and lets a language model pick the one that best
//! fits a free-text vibe. Results are served as HTML pages, a JSON API and
//! an interactive map.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod finder;
pub mod geo;
pub mod html;
pub mod map;
pub mod models;
pub mod pages;
pub mod ranking;
pub mod telemetry;
pub mod vibe;
pub mod web;

#[cfg(test)]
mod test_support;

// Re-export core types for public API
pub use config::VibeFinderConfig;
pub use error::VibeFinderError;
pub use finder::{PubFinder, Recommendation, SearchQuery};
pub use models::{Location, PointOfInterest, RankedPub, VibeMatchResult};
pub use web::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, VibeFinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
