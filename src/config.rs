//! Configuration management for the vibe beer finder
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::VibeFinderError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Conventional variable holding the Google AI Studio key.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VibeFinderConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Points-of-interest dataset settings
    pub dataset: DatasetConfig,
    /// Text generation (Gemini) settings
    pub gemini: GeminiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Default application settings
    pub defaults: DefaultsConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/static`, also where the map is written
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// File name of the generated map inside `static_dir`
    #[serde(default = "default_map_file")]
    pub map_file: String,
}

/// Dataset configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Hub dataset identifier
    #[serde(default = "default_dataset_name")]
    pub name: String,
    /// Base URL of the datasets-server API
    #[serde(default = "default_dataset_base_url")]
    pub base_url: String,
    /// Dataset config (subset) name
    #[serde(default = "default_dataset_config")]
    pub config: String,
    /// Dataset split to read
    #[serde(default = "default_dataset_split")]
    pub split: String,
    /// Rows requested per page (the datasets-server caps this at 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Per-page request timeout in seconds
    #[serde(default = "default_dataset_timeout")]
    pub timeout_seconds: u32,
    /// Local CSV snapshot (`id,lat,lon,tags`); takes precedence over the hub
    pub snapshot_path: Option<String>,
    /// Region named in the model prompt
    #[serde(default = "default_region")]
    pub region: String,
    /// Tag key the rows are filtered on
    #[serde(default = "default_filter_key")]
    pub filter_key: String,
    /// Tag value the rows are filtered on
    #[serde(default = "default_filter_value")]
    pub filter_value: String,
}

/// Gemini API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; vibe matching runs in degraded mode without it
    pub api_key: Option<String>,
    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Base URL for the Generative Language API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Request timeout in seconds, unset means wait indefinitely
    pub timeout_seconds: Option<u32>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP endpoint for trace export
    pub otlp_endpoint: Option<String>,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Number of nearest pubs to rank and show
    #[serde(default = "default_max_pubs")]
    pub max_pubs: u32,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_map_file() -> String {
    "pub_map.html".to_string()
}

fn default_dataset_name() -> String {
    "ns2agi/antwerp-osm-navigator".to_string()
}

fn default_dataset_base_url() -> String {
    "https://datasets-server.huggingface.co".to_string()
}

fn default_dataset_config() -> String {
    "default".to_string()
}

fn default_dataset_split() -> String {
    "train".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_dataset_timeout() -> u32 {
    30
}

fn default_region() -> String {
    "Antwerp".to_string()
}

fn default_filter_key() -> String {
    "amenity".to_string()
}

fn default_filter_value() -> String {
    "pub".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_pubs() -> u32 {
    crate::ranking::DEFAULT_TOP_N as u32
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            map_file: default_map_file(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name: default_dataset_name(),
            base_url: default_dataset_base_url(),
            config: default_dataset_config(),
            split: default_dataset_split(),
            page_size: default_page_size(),
            timeout_seconds: default_dataset_timeout(),
            snapshot_path: None,
            region: default_region(),
            filter_key: default_filter_key(),
            filter_value: default_filter_value(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_pubs: default_max_pubs(),
        }
    }
}

impl VibeFinderConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Explicit path, then the working directory, then the user config dir
        let config_file = config_path.unwrap_or_else(|| {
            let local = PathBuf::from("config.toml");
            if local.exists() {
                local
            } else {
                Self::get_config_path().unwrap_or(local)
            }
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // VIBEPUB_GEMINI__API_KEY, VIBEPUB_SERVER__PORT, ...
        builder = builder.add_source(
            Environment::with_prefix("VIBEPUB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: VibeFinderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_environment_fallbacks();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vibe-beer-finder").join("config.toml"))
    }

    /// Pick up `GOOGLE_API_KEY` when no key was configured explicitly
    pub fn apply_environment_fallbacks(&mut self) {
        if self.gemini.api_key.is_none() {
            self.gemini.api_key = std::env::var(GOOGLE_API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.server.map_file.is_empty() {
            self.server.map_file = default_map_file();
        }
        if self.dataset.name.is_empty() {
            self.dataset.name = default_dataset_name();
        }
        if self.dataset.base_url.is_empty() {
            self.dataset.base_url = default_dataset_base_url();
        }
        if self.dataset.page_size == 0 {
            self.dataset.page_size = default_page_size();
        }
        if self.dataset.timeout_seconds == 0 {
            self.dataset.timeout_seconds = default_dataset_timeout();
        }
        if self.dataset.region.is_empty() {
            self.dataset.region = default_region();
        }
        if self.gemini.model.is_empty() {
            self.gemini.model = default_gemini_model();
        }
        if self.gemini.base_url.is_empty() {
            self.gemini.base_url = default_gemini_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.max_pubs == 0 {
            self.defaults.max_pubs = default_max_pubs();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // Absent is fine (degraded mode), present-but-blank is a mistake
        if let Some(api_key) = &self.gemini.api_key
            && api_key.trim().is_empty()
        {
            return Err(VibeFinderError::config(
                "Gemini API key cannot be empty if provided. Either remove it or provide a valid key.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(VibeFinderError::config("Server port cannot be 0").into());
        }

        if self.dataset.page_size > 100 {
            return Err(
                VibeFinderError::config("Dataset page size cannot exceed 100 rows").into(),
            );
        }

        if self.dataset.timeout_seconds > 300 {
            return Err(
                VibeFinderError::config("Dataset request timeout cannot exceed 300 seconds").into(),
            );
        }

        if let Some(timeout) = self.gemini.timeout_seconds
            && timeout > 300
        {
            return Err(
                VibeFinderError::config("Gemini API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.defaults.max_pubs > 50 {
            return Err(VibeFinderError::config("Maximum pubs cannot exceed 50").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(VibeFinderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(VibeFinderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Dataset base URL", Some(&self.dataset.base_url)),
            ("Gemini base URL", Some(&self.gemini.base_url)),
            ("OTLP endpoint", self.logging.otlp_endpoint.as_ref()),
        ];
        for (label, url) in urls {
            if let Some(url) = url
                && !url.starts_with("http://")
                && !url.starts_with("https://")
            {
                return Err(VibeFinderError::config(format!(
                    "{label} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.dataset.filter_key.is_empty() || self.dataset.filter_value.is_empty() {
            return Err(
                VibeFinderError::config("Dataset filter key and value must both be set").into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = VibeFinderConfig::default();
        assert_eq!(config.dataset.name, "ns2agi/antwerp-osm-navigator");
        assert_eq!(config.dataset.filter_key, "amenity");
        assert_eq!(config.dataset.filter_value, "pub");
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.map_file, "pub_map.html");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.max_pubs, 5);
        assert!(config.gemini.api_key.is_none());
        assert!(config.gemini.timeout_seconds.is_none());
        assert_eq!(config.dataset.timeout_seconds, 30);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(VibeFinderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_api_key() {
        let config = VibeFinderConfig::default();
        // Missing key means degraded mode, not a startup failure
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_blank_api_key() {
        let mut config = VibeFinderConfig::default();
        config.gemini.api_key = Some("   ".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = VibeFinderConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_log_format() {
        let mut config = VibeFinderConfig::default();
        config.logging.format = "xml".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = VibeFinderConfig::default();
        config.gemini.timeout_seconds = Some(500);
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = VibeFinderConfig::default();
        config.defaults.max_pubs = 51;
        assert!(config.validate().is_err());

        let mut config = VibeFinderConfig::default();
        config.dataset.page_size = 101;
        assert!(config.validate().is_err());

        let mut config = VibeFinderConfig::default();
        config.dataset.timeout_seconds = 301;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Dataset request timeout"));
    }

    #[test]
    fn test_config_validation_urls() {
        let mut config = VibeFinderConfig::default();
        config.gemini.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Gemini base URL"));

        let mut config = VibeFinderConfig::default();
        config.logging.otlp_endpoint = Some("localhost:4318".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = VibeFinderConfig::default();
        config.server.map_file = String::new();
        config.defaults.max_pubs = 0;
        config.dataset.page_size = 0;
        config.apply_defaults();
        assert_eq!(config.server.map_file, "pub_map.html");
        assert_eq!(config.defaults.max_pubs, 5);
        assert_eq!(config.dataset.page_size, 100);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[dataset]\nfilter_value = \"bar\"\n\n[defaults]\nmax_pubs = 3"
        )
        .unwrap();

        let config = VibeFinderConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.dataset.filter_value, "bar");
        assert_eq!(config.dataset.filter_key, "amenity");
        assert_eq!(config.defaults.max_pubs, 3);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = VibeFinderConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("vibe-beer-finder"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
