//! Points-of-interest dataset access
//!
//! A [`PoiSource`] yields raw rows; [`load_filtered`] decodes their tags and
//! keeps the rows a [`TagFilter`] accepts.

pub mod filter;
pub mod hub;
pub mod snapshot;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

pub use filter::{TagFilter, filter_rows, parse_tags};
pub use hub::HubDatasetSource;
pub use snapshot::CsvSnapshotSource;

use crate::Result;
use crate::config::DatasetConfig;
use crate::models::{PointOfInterest, RawPoiRow};

/// Anything that can produce the full table of dataset rows
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// Short human-readable origin, used in logs
    fn describe(&self) -> String;

    async fn fetch_rows(&self) -> Result<Vec<RawPoiRow>>;
}

/// Pick the snapshot when one is configured, the hub otherwise
pub fn source_from_config(config: &DatasetConfig) -> Result<Arc<dyn PoiSource>> {
    match &config.snapshot_path {
        Some(path) => Ok(Arc::new(CsvSnapshotSource::new(path))),
        None => Ok(Arc::new(HubDatasetSource::new(config)?)),
    }
}

/// Fetch every row and keep the ones matching `filter`
pub async fn load_filtered(
    source: &dyn PoiSource,
    filter: &TagFilter,
) -> Result<Vec<PointOfInterest>> {
    let rows = source.fetch_rows().await?;
    let total = rows.len();
    let matching = filter_rows(rows, |tags| filter.matches(tags));

    info!(
        "Found {} of {} rows with {}={} in {}",
        matching.len(),
        total,
        filter.key,
        filter.value,
        source.describe()
    );
    Ok(matching)
}
