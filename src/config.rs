//! Configuration management for `Placecast`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlacecastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlacecastConfig {
    /// Upstream provider configuration
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Geocode cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Name-search geocoding endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Forecast endpoint (current + daily)
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Hourly observation endpoint
    #[serde(default = "default_observation_url")]
    pub observation_url: String,
    /// Address/point geocoding endpoint
    #[serde(default = "default_address_url")]
    pub address_url: String,
    /// API key for the address provider
    pub address_api_key: Option<String>,
    /// Result language
    #[serde(default = "default_language")]
    pub language: String,
    /// Maximum number of name-search candidates
    #[serde(default = "default_result_cap")]
    pub result_cap: u32,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Geocode cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
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
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_observation_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_address_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_language() -> String {
    "es".to_string()
}

fn default_result_cap() -> u32 {
    10
}

fn default_timeout() -> u32 {
    10
}

fn default_cache_ttl() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5174
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            observation_url: default_observation_url(),
            address_url: default_address_url(),
            address_api_key: None,
            language: default_language(),
            result_cap: default_result_cap(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ProvidersConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl PlacecastConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|p| p.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // PLACECAST_PROVIDERS__ADDRESS_API_KEY=... etc.
        builder = builder.add_source(
            Environment::with_prefix("PLACECAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlacecastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("placecast").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        let providers = &mut self.providers;
        if providers.geocoding_url.is_empty() {
            providers.geocoding_url = default_geocoding_url();
        }
        if providers.forecast_url.is_empty() {
            providers.forecast_url = default_forecast_url();
        }
        if providers.observation_url.is_empty() {
            providers.observation_url = default_observation_url();
        }
        if providers.address_url.is_empty() {
            providers.address_url = default_address_url();
        }
        if providers.language.is_empty() {
            providers.language = default_language();
        }
        if providers.result_cap == 0 {
            providers.result_cap = default_result_cap();
        }
        if providers.timeout_seconds == 0 {
            providers.timeout_seconds = default_timeout();
        }
        if self.cache.ttl_seconds == 0 {
            self.cache.ttl_seconds = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> std::result::Result<(), PlacecastError> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> std::result::Result<(), PlacecastError> {
        if self.providers.timeout_seconds > 120 {
            return Err(PlacecastError::config(
                "Provider timeout cannot exceed 120 seconds",
            ));
        }

        if !(1..=100).contains(&self.providers.result_cap) {
            return Err(PlacecastError::config(
                "Result cap must be between 1 and 100",
            ));
        }

        if self.cache.ttl_seconds > 24 * 60 * 60 {
            return Err(PlacecastError::config(
                "Cache TTL cannot exceed 86400 seconds (1 day)",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> std::result::Result<(), PlacecastError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlacecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlacecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        let urls = [
            ("geocoding_url", &self.providers.geocoding_url),
            ("forecast_url", &self.providers.forecast_url),
            ("observation_url", &self.providers.observation_url),
            ("address_url", &self.providers.address_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PlacecastError::config(format!(
                    "Provider {name} must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        if self
            .providers
            .address_api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            return Err(PlacecastError::config(
                "Address API key cannot be empty if provided. Either remove it or provide a valid key.",
            ));
        }

        Ok(())
    }
}
