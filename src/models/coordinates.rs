//! Geographic coordinates in decimal degrees

use serde::{Deserialize, Serialize};

use crate::{CityGuideError, Result};

/// A latitude/longitude pair in decimal degrees.
///
/// Fields are public so catalogs can be deserialized as-is; anything that
/// does math on coordinates calls [`Coordinates::validate`] first.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "lng", alias = "longitude")]
    pub longitude: f64,
}

impl Coordinates {
    /// Create validated coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinates = Self {
            latitude,
            longitude,
        };
        coordinates.validate()?;
        Ok(coordinates)
    }

    /// Fails with `InvalidCoordinate` when latitude is outside [-90, 90],
    /// longitude outside [-180, 180], or either is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CityGuideError::invalid_coordinate(
                self.latitude,
                self.longitude,
            ))
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = CityGuideError;

    /// Parses `"LAT,LNG"`.
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| CityGuideError::validation(format!("expected LAT,LNG, got '{s}'")))?;
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| CityGuideError::validation(format!("bad latitude '{lat}': {e}")))?;
        let longitude = lng
            .trim()
            .parse::<f64>()
            .map_err(|e| CityGuideError::validation(format!("bad longitude '{lng}': {e}")))?;
        Self::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(37.3886, -5.9953)]
    fn test_valid_coordinates(#[case] lat: f64, #[case] lng: f64) {
        assert!(Coordinates::new(lat, lng).is_ok());
    }

    #[rstest]
    #[case(200.0, 0.0)]
    #[case(-90.5, 0.0)]
    #[case(0.0, 180.1)]
    #[case(0.0, -181.0)]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn test_invalid_coordinates(#[case] lat: f64, #[case] lng: f64) {
        let err = Coordinates::new(lat, lng).unwrap_err();
        assert!(matches!(err, CityGuideError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_parse_lat_lng() {
        let c: Coordinates = "37.3886, -5.9953".parse().unwrap();
        assert_eq!(c.latitude, 37.3886);
        assert_eq!(c.longitude, -5.9953);

        assert!("37.3886".parse::<Coordinates>().is_err());
        assert!("abc,1".parse::<Coordinates>().is_err());
        assert!(matches!(
            "200,1".parse::<Coordinates>(),
            Err(CityGuideError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_serde_uses_lat_lng() {
        let c: Coordinates = serde_json::from_str(r#"{"lat": 50.9413, "lng": 6.9583}"#).unwrap();
        assert_eq!(c.latitude, 50.9413);
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"lat\""));
        assert!(json.contains("\"lng\""));
    }
}
