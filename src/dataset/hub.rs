//! Hugging Face datasets-server client
//!
//! Pages through `/rows` until the whole split has been read. The server caps a
//! page at 100 rows.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::PoiSource;
use crate::config::DatasetConfig;
use crate::models::RawPoiRow;
use crate::{Result, VibeFinderError};

/// Reads a dataset split from the datasets-server REST API
pub struct HubDatasetSource {
    client: Client,
    base_url: String,
    dataset: String,
    config: String,
    split: String,
    page_size: u32,
}

/// One page of `/rows`
#[derive(Debug, Deserialize)]
struct RowsResponse {
    rows: Vec<RowEntry>,
    num_rows_total: u64,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row_idx: u64,
    row: Value,
}

impl HubDatasetSource {
    pub fn new(config: &DatasetConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("vibe-beer-finder/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(|e| VibeFinderError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dataset: config.name.clone(),
            config: config.config.clone(),
            split: config.split.clone(),
            page_size: config.page_size,
        })
    }

    fn page_url(&self, offset: u64) -> String {
        format!(
            "{}/rows?dataset={}&config={}&split={}&offset={}&length={}",
            self.base_url,
            urlencoding::encode(&self.dataset),
            urlencoding::encode(&self.config),
            urlencoding::encode(&self.split),
            offset,
            self.page_size
        )
    }

    async fn fetch_page(&self, offset: u64) -> Result<RowsResponse> {
        let url = self.page_url(offset);
        debug!("Fetching dataset page: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VibeFinderError::api(format!("Dataset request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => VibeFinderError::api(format!(
                    "Dataset '{}' is not accessible without credentials",
                    self.dataset
                )),
                404 => VibeFinderError::api(format!(
                    "Dataset '{}' (config '{}', split '{}') not found",
                    self.dataset, self.config, self.split
                )),
                429 => VibeFinderError::api("Dataset server rate limit exceeded"),
                _ => VibeFinderError::api(format!(
                    "Dataset server error {status}: {error_text}"
                )),
            });
        }

        response.json().await.map_err(|e| {
            VibeFinderError::dataset(format!("Failed to parse dataset page at offset {offset}: {e}"))
        })
    }
}

#[async_trait]
impl PoiSource for HubDatasetSource {
    fn describe(&self) -> String {
        format!("hub:{}/{}/{}", self.dataset, self.config, self.split)
    }

    #[instrument(skip(self), fields(dataset = %self.dataset))]
    async fn fetch_rows(&self) -> Result<Vec<RawPoiRow>> {
        let start_time = Instant::now();
        let mut rows = Vec::new();
        let mut offset = 0u64;

        loop {
            let page = self.fetch_page(offset).await?;
            let received = page.rows.len() as u64;

            rows.extend(decode_entries(page.rows));

            offset += received;
            if received == 0 || offset >= page.num_rows_total {
                break;
            }
        }

        info!(
            "Read {} rows from {} in {:.3}s",
            rows.len(),
            self.dataset,
            start_time.elapsed().as_secs_f64()
        );
        Ok(rows)
    }
}

fn decode_entries(entries: Vec<RowEntry>) -> Vec<RawPoiRow> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawPoiRow>(entry.row) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!("Skipping dataset row {}: {}", entry.row_idx, e);
                None
            }
        })
        .collect()
}
