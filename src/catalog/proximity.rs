//! Proximity Engine
//!
//! Great-circle distances from the visitor to each site, walking-time
//! estimates, walking-time thresholds and nearest-first ranking. Without a
//! position every site is measured as "unknown" and thresholds let it through.

use serde::Serialize;
use tracing::debug;

use crate::models::{Coordinates, Site};
use crate::{CityGuideError, Result};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Reference average walking speed
pub const DEFAULT_WALKING_SPEED_KMH: f64 = 5.0;

/// Fastest accepted average walking speed
pub const MAX_WALKING_SPEED_KMH: f64 = 20.0;

/// Haversine distance in kilometers between two points.
///
/// Both points are validated first; out-of-range input fails with
/// `InvalidCoordinate` rather than being clamped.
pub fn haversine_km(from: &Coordinates, to: &Coordinates) -> Result<f64> {
    from.validate()?;
    to.validate()?;

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Ok(EARTH_RADIUS_KM * c)
}

/// Human-readable walking time: `"N min"` under an hour, otherwise
/// `"H hr"` or `"H hr M min"`.
#[must_use]
pub fn format_walking_time(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{hours} hr")
    } else {
        format!("{hours} hr {rest} min")
    }
}

/// A site with its distance and walking time from the visitor.
/// Both are `None` when the visitor's position is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteDistance<'a> {
    pub site: &'a Site,
    pub distance_km: Option<f64>,
    pub walking_minutes: Option<u32>,
}

impl SiteDistance<'_> {
    /// Unknown walking time always passes
    #[must_use]
    pub fn within(&self, max_minutes: u32) -> bool {
        self.walking_minutes.is_none_or(|m| m <= max_minutes)
    }

    #[must_use]
    pub fn formatted_walking_time(&self) -> Option<String> {
        self.walking_minutes.map(format_walking_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityEngine {
    walking_speed_kmh: f64,
}

impl Default for ProximityEngine {
    fn default() -> Self {
        Self {
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
        }
    }
}

impl ProximityEngine {
    /// Create an engine with a custom average walking speed, within (0, 20] km/h
    pub fn new(walking_speed_kmh: f64) -> Result<Self> {
        if !walking_speed_kmh.is_finite()
            || walking_speed_kmh <= 0.0
            || walking_speed_kmh > MAX_WALKING_SPEED_KMH
        {
            return Err(CityGuideError::validation(format!(
                "walking speed must be within (0, {MAX_WALKING_SPEED_KMH}] km/h, \
                 got {walking_speed_kmh}"
            )));
        }
        Ok(Self { walking_speed_kmh })
    }

    #[must_use]
    pub fn walking_speed_kmh(&self) -> f64 {
        self.walking_speed_kmh
    }

    /// Minutes needed to walk `distance_km`, rounded to the nearest minute
    #[must_use]
    pub fn walking_minutes(&self, distance_km: f64) -> u32 {
        let minutes = (distance_km.max(0.0) / self.walking_speed_kmh * 60.0).round();
        // `as` saturates, so a crawl-speed engine tops out at u32::MAX
        minutes as u32
    }

    /// Distance and walking time from `from` to `to`
    pub fn measure_between(&self, from: &Coordinates, to: &Coordinates) -> Result<(f64, u32)> {
        let km = haversine_km(from, to)?;
        Ok((km, self.walking_minutes(km)))
    }

    /// Measure every site, in input order.
    ///
    /// With no position every entry has unknown distance. Any invalid
    /// coordinate aborts the whole call; no partial result is returned.
    pub fn measure<'a, I>(
        &self,
        sites: I,
        position: Option<&Coordinates>,
    ) -> Result<Vec<SiteDistance<'a>>>
    where
        I: IntoIterator<Item = &'a Site>,
    {
        let Some(origin) = position else {
            debug!("No position available, distances unknown");
            return Ok(sites
                .into_iter()
                .map(|site| SiteDistance {
                    site,
                    distance_km: None,
                    walking_minutes: None,
                })
                .collect());
        };

        origin.validate()?;
        let measured = sites
            .into_iter()
            .map(|site| {
                let (km, minutes) = self.measure_between(origin, &site.coordinates)?;
                Ok(SiteDistance {
                    site,
                    distance_km: Some(km),
                    walking_minutes: Some(minutes),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Measured {} sites from {}", measured.len(), origin.format());
        Ok(measured)
    }

    /// Keep sites reachable within `max_minutes`, plus every site whose
    /// walking time is unknown. Order is preserved.
    #[must_use]
    pub fn within_walking_time<'a>(
        measured: Vec<SiteDistance<'a>>,
        max_minutes: u32,
    ) -> Vec<SiteDistance<'a>> {
        measured
            .into_iter()
            .filter(|entry| entry.within(max_minutes))
            .collect()
    }

    /// Stable sort nearest first. Unknown distances go last, in their
    /// original relative order.
    pub fn rank_by_proximity(measured: &mut [SiteDistance<'_>]) {
        measured.sort_by(|a, b| match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }
}
