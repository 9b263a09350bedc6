//! Site catalog module
//!
//! This module provides everything that works on the fixed list of sites:
//! - Catalog validation and lookup
//! - Loading built-in and file-based catalogs
//! - Visit-status and quick filtering
//! - Distance, walking time and proximity ranking
//! - Visit progress statistics

pub mod filter;
pub mod loader;
pub mod progress;
pub mod proximity;

use std::collections::{HashMap, HashSet};

use crate::models::{Coordinates, Site};
use crate::{CityGuideError, Result};

// Re-export commonly used types from submodules
pub use filter::{EmptyState, FilteredSites, QuickFilter, SiteFilter, VisitFilter};
pub use loader::{BuiltinCity, CatalogLoader};
pub use progress::{FilterCounts, Progress};
pub use proximity::{ProximityEngine, SiteDistance, format_walking_time, haversine_km};

/// Ordered, validated list of sites. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    city: String,
    center: Coordinates,
    sites: Vec<Site>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids, out-of-range coordinates and
    /// ratings outside 0..=5.
    pub fn new(city: impl Into<String>, center: Coordinates, sites: Vec<Site>) -> Result<Self> {
        center.validate()?;

        let mut index = HashMap::with_capacity(sites.len());
        for (position, site) in sites.iter().enumerate() {
            if site.id.trim().is_empty() {
                return Err(CityGuideError::catalog(format!(
                    "site at position {position} has an empty id"
                )));
            }
            site.coordinates.validate()?;
            if !(0.0..=5.0).contains(&site.rating) {
                return Err(CityGuideError::catalog(format!(
                    "site '{}' has rating {} outside 0..=5",
                    site.id, site.rating
                )));
            }
            if index.insert(site.id.clone(), position).is_some() {
                return Err(CityGuideError::catalog(format!(
                    "duplicate site id '{}'",
                    site.id
                )));
            }
        }

        Ok(Self {
            city: city.into(),
            center,
            sites,
            index,
        })
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Default map center for the city
    #[must_use]
    pub fn center(&self) -> Coordinates {
        self.center
    }

    /// Sites in catalog order
    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    #[must_use]
    pub fn get(&self, site_id: &str) -> Option<&Site> {
        self.index.get(site_id).map(|&i| &self.sites[i])
    }

    #[must_use]
    pub fn contains(&self, site_id: &str) -> bool {
        self.index.contains_key(site_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Ids from `ids` that are not in the catalog
    pub fn unknown_ids<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> HashSet<&'a str> {
        ids.into_iter().filter(|id| !self.contains(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::site::test_support::site;
    use crate::models::{CrowdLevel, Popularity};

    fn center() -> Coordinates {
        Coordinates::new(37.3886, -5.9953).unwrap()
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::new(
            "Sevilla",
            center(),
            vec![
                site("giralda", "1 hour", CrowdLevel::High, Popularity::MustSee),
                site("triana", "2-3 hours", CrowdLevel::Medium, Popularity::Popular),
            ],
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("triana").unwrap().id, "triana");
        assert!(catalog.get("nope").is_none());
        assert_eq!(catalog.sites()[0].id, "giralda");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(
            "Sevilla",
            center(),
            vec![
                site("giralda", "1 hour", CrowdLevel::High, Popularity::MustSee),
                site("giralda", "1 hour", CrowdLevel::High, Popularity::MustSee),
            ],
        );
        assert!(matches!(result, Err(CityGuideError::Catalog { .. })));
    }

    #[test]
    fn test_invalid_site_coordinates_rejected() {
        let mut bad = site("giralda", "1 hour", CrowdLevel::High, Popularity::MustSee);
        bad.coordinates.latitude = 200.0;
        let result = Catalog::new("Sevilla", center(), vec![bad]);
        assert!(matches!(
            result,
            Err(CityGuideError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let mut bad = site("giralda", "1 hour", CrowdLevel::High, Popularity::MustSee);
        bad.rating = 7.5;
        assert!(Catalog::new("Sevilla", center(), vec![bad]).is_err());
    }

    #[test]
    fn test_unknown_ids() {
        let catalog = Catalog::new(
            "Sevilla",
            center(),
            vec![site("giralda", "1 hour", CrowdLevel::High, Popularity::MustSee)],
        )
        .unwrap();
        let unknown = catalog.unknown_ids(["giralda", "atlantis"]);
        assert_eq!(unknown.len(), 1);
        assert!(unknown.contains("atlantis"));
    }
}
