use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::Result;

/// A resolved geolocation fix for the visitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinates: Coordinates,
    /// Reported accuracy radius in meters, if the provider gives one
    pub accuracy_m: Option<f64>,
    pub acquired_at: DateTime<Utc>,
}

impl Position {
    /// Create a position stamped with the current time
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            coordinates: Coordinates::new(latitude, longitude)?,
            accuracy_m: None,
            acquired_at: Utc::now(),
        })
    }
}
