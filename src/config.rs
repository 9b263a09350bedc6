//! Configuration management for `CityGuide`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::CityGuideError;
use crate::catalog::BuiltinCity;
use crate::catalog::proximity::MAX_WALKING_SPEED_KMH;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `CityGuide`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityGuideConfig {
    /// Which site catalog to use
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Distance and walking-time settings
    #[serde(default)]
    pub proximity: ProximityConfig,
    /// Where visits and preferences are kept
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Built-in city catalog
    #[serde(default)]
    pub city: BuiltinCity,
    /// JSON catalog file replacing the built-in one
    pub path: Option<PathBuf>,
}

/// Proximity engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Average walking speed in km/h
    #[serde(default = "default_walking_speed")]
    pub walking_speed_kmh: f64,
    /// How long to wait for a position fix
    #[serde(default = "default_geolocation_timeout")]
    pub geolocation_timeout_ms: u64,
    /// Walking-time threshold applied when none is given explicitly
    pub default_max_walking_minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Fjall,
    Memory,
}

/// State storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory of the on-disk store
    #[serde(default = "default_storage_location")]
    pub location: PathBuf,
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

// Default value functions
fn default_walking_speed() -> f64 {
    crate::catalog::proximity::DEFAULT_WALKING_SPEED_KMH
}

fn default_geolocation_timeout() -> u64 {
    5000
}

fn default_storage_location() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("cityguide"))
        .unwrap_or_else(|| PathBuf::from(".cityguide"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            walking_speed_kmh: default_walking_speed(),
            geolocation_timeout_ms: default_geolocation_timeout(),
            default_max_walking_minutes: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            location: default_storage_location(),
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

impl Default for CityGuideConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            proximity: ProximityConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CityGuideConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CITYGUIDE_PROXIMITY__WALKING_SPEED_KMH -> proximity.walking_speed_kmh
        builder = builder.add_source(
            Environment::with_prefix("CITYGUIDE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CityGuideConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cityguide").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.proximity.geolocation_timeout_ms == 0 {
            self.proximity.geolocation_timeout_ms = default_geolocation_timeout();
        }
        if self.storage.location.as_os_str().is_empty() {
            self.storage.location = default_storage_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let speed = self.proximity.walking_speed_kmh;
        if !speed.is_finite() || speed <= 0.0 || speed > MAX_WALKING_SPEED_KMH {
            return Err(CityGuideError::config(format!(
                "Walking speed must be within (0, {MAX_WALKING_SPEED_KMH}] km/h, got {speed}"
            ))
            .into());
        }

        if self.proximity.geolocation_timeout_ms > 60_000 {
            return Err(
                CityGuideError::config("Geolocation timeout cannot exceed 60000 ms").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CityGuideError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CityGuideError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
