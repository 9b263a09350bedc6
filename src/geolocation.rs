//! Geolocation acquisition
//!
//! A position request is a single attempt bounded by a timeout. It resolves
//! to a validated [`Position`] or a classified [`GeolocationError`]; it is
//! never retried here. Callers treat any error as "position unavailable".

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Position;

/// Reference timeout for a position request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("no position within {waited_ms} ms")]
    Timeout { waited_ms: u64 },

    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("position unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("provider returned an invalid fix ({latitude}, {longitude})")]
    InvalidFix { latitude: f64, longitude: f64 },
}

impl GeolocationError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GeolocationError::PermissionDenied => {
                "Location permission was denied. Distances are hidden.".to_string()
            }
            GeolocationError::Timeout { .. } => {
                "Finding your location took too long. Please try again.".to_string()
            }
            GeolocationError::Unsupported => {
                "Your device does not support geolocation.".to_string()
            }
            GeolocationError::Unavailable { .. } | GeolocationError::InvalidFix { .. } => {
                "Your location is currently unavailable.".to_string()
            }
        }
    }
}

/// Source of the visitor's current position
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// Request one position fix, giving up after `timeout`
pub async fn request_position(
    provider: &dyn PositionProvider,
    timeout: Duration,
) -> Result<Position, GeolocationError> {
    debug!("Requesting position with {:?} timeout", timeout);

    let outcome = match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(result) => result,
        Err(_) => Err(GeolocationError::Timeout {
            waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    };

    let outcome = outcome.and_then(|position| {
        if position.coordinates.is_valid() {
            Ok(position)
        } else {
            Err(GeolocationError::InvalidFix {
                latitude: position.coordinates.latitude,
                longitude: position.coordinates.longitude,
            })
        }
    });

    match &outcome {
        Ok(position) => info!("Position acquired at {}", position.coordinates.format()),
        Err(e) => warn!("Position request failed: {}", e),
    }
    outcome
}

/// Always reports the same position, e.g. one given on the command line
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionProvider {
    position: Position,
}

impl FixedPositionProvider {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

#[async_trait]
impl PositionProvider for FixedPositionProvider {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Ok(self.position)
    }
}

/// For environments with no location source
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProvider;

#[async_trait]
impl PositionProvider for UnsupportedProvider {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use chrono::Utc;

    struct SlowProvider;

    #[async_trait]
    impl PositionProvider for SlowProvider {
        async fn current_position(&self) -> Result<Position, GeolocationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Position::new(0.0, 0.0).map_err(|e| GeolocationError::Unavailable {
                reason: e.to_string(),
            })
        }
    }

    struct DeniedProvider;

    #[async_trait]
    impl PositionProvider for DeniedProvider {
        async fn current_position(&self) -> Result<Position, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl PositionProvider for BrokenProvider {
        async fn current_position(&self) -> Result<Position, GeolocationError> {
            Ok(Position {
                coordinates: Coordinates {
                    latitude: 123.0,
                    longitude: 0.0,
                },
                accuracy_m: None,
                acquired_at: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn test_fixed_provider_resolves() {
        let provider = FixedPositionProvider::new(Position::new(37.3886, -5.9953).unwrap());
        let position = request_position(&provider, DEFAULT_TIMEOUT).await.unwrap();
        assert_eq!(position.coordinates.latitude, 37.3886);
    }

    #[tokio::test]
    async fn test_timeout() {
        let result = request_position(&SlowProvider, Duration::from_millis(50)).await;
        assert_eq!(result, Err(GeolocationError::Timeout { waited_ms: 50 }));
    }

    #[tokio::test]
    async fn test_errors_are_passed_through() {
        assert_eq!(
            request_position(&DeniedProvider, DEFAULT_TIMEOUT).await,
            Err(GeolocationError::PermissionDenied)
        );
        assert_eq!(
            request_position(&UnsupportedProvider, DEFAULT_TIMEOUT).await,
            Err(GeolocationError::Unsupported)
        );
    }

    #[tokio::test]
    async fn test_invalid_fix_rejected() {
        let result = request_position(&BrokenProvider, DEFAULT_TIMEOUT).await;
        assert!(matches!(result, Err(GeolocationError::InvalidFix { .. })));
    }
}
