//! Data models for the vibe beer finder
//!
//! - Location: the user's query point
//! - Poi: dataset rows and decoded points of interest
//! - Ranked: pubs with distances, and the vibe match built from them

pub mod location;
pub mod poi;
pub mod ranked;

// Re-export all public types for convenient access
pub use location::Location;
pub use poi::{PointOfInterest, RawPoiRow, Tags};
pub use ranked::{RankedPub, VibeMatchResult};
