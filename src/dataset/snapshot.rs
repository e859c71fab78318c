//! Local CSV snapshot of the dataset (`id,lat,lon,tags`)

use async_trait::async_trait;
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::PoiSource;
use crate::models::RawPoiRow;
use crate::{Result, VibeFinderError};

/// Reads rows from a CSV export of the dataset
pub struct CsvSnapshotSource {
    path: PathBuf,
}

impl CsvSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn read_snapshot(path: &Path) -> Result<Vec<RawPoiRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| {
            VibeFinderError::dataset(format!("Cannot open snapshot {}: {e}", path.display()))
        })?;

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<RawPoiRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Skipping snapshot record {}: {}", line + 1, e),
        }
    }
    Ok(rows)
}

#[async_trait]
impl PoiSource for CsvSnapshotSource {
    fn describe(&self) -> String {
        format!("snapshot:{}", self.path.display())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_rows(&self) -> Result<Vec<RawPoiRow>> {
        let path = self.path.clone();
        let rows = task::spawn_blocking(move || read_snapshot(&path))
            .await
            .map_err(|e| VibeFinderError::general(format!("Snapshot reader crashed: {e}")))??;

        debug!("Read {} rows from snapshot", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_rows_with_missing_coordinates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,lat,lon,tags").unwrap();
        writeln!(
            file,
            r#"1,51.2195,4.4010,"{{""amenity"": ""pub"", ""name"": ""Het Elfde Gebod""}}""#
        )
        .unwrap();
        writeln!(file, "2,,4.4,{{}}").unwrap();
        writeln!(file, "oops,51.0,4.0,{{}}").unwrap();

        let source = CsvSnapshotSource::new(file.path());
        let rows = source.fetch_rows().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert!(rows[0].tags.contains("Het Elfde Gebod"));
        assert!(rows[1].lat.is_none());
        assert_eq!(rows[1].lon, Some(4.4));
        assert_eq!(rows[1].tags, "{}");
    }

    #[tokio::test]
    async fn test_missing_file_is_dataset_error() {
        let source = CsvSnapshotSource::new("/definitely/not/here.csv");
        let err = source.fetch_rows().await.unwrap_err();
        assert!(matches!(err, VibeFinderError::Dataset { .. }));
    }
}
