//! Error types and handling for `CityGuide`

use thiserror::Error;

use crate::geolocation::GeolocationError;

/// Main error type for the `CityGuide` library
#[derive(Error, Debug)]
pub enum CityGuideError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Site catalog could not be loaded or is inconsistent
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// State store operation errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Position acquisition errors
    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    /// JSON encoding/decoding errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CityGuideError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_coordinate(latitude: f64, longitude: f64) -> Self {
        Self::InvalidCoordinate {
            latitude,
            longitude,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CityGuideError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            CityGuideError::Validation { message } => format!("Invalid input: {message}"),
            CityGuideError::InvalidCoordinate {
                latitude,
                longitude,
            } => format!(
                "Coordinates ({latitude}, {longitude}) are out of range. Latitude must be within \
                 -90..90 and longitude within -180..180."
            ),
            CityGuideError::Catalog { message } => format!("Site catalog problem: {message}"),
            CityGuideError::Storage { .. } => {
                "Saving or loading your visits failed. You may need to clear the data directory."
                    .to_string()
            }
            CityGuideError::Geolocation(err) => err.user_message(),
            CityGuideError::Serialization { .. } => {
                "Stored data could not be read or written.".to_string()
            }
            CityGuideError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
