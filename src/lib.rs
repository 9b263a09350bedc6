//! `CityGuide` - Site tracking companion for city visits
//!
//! This library provides the core functionality behind a tourism guide:
//! filtering a city's site catalog by visit status and quick filters,
//! estimating walking distance and time from the visitor's position, and
//! keeping visits, annotations and preferences in a pluggable store.

pub mod catalog;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod logging;
pub mod models;
pub mod state;

// Re-export core types for public API
pub use catalog::{
    BuiltinCity, Catalog, CatalogLoader, EmptyState, FilteredSites, ProximityEngine, QuickFilter,
    SiteDistance, SiteFilter, VisitFilter,
};
pub use config::CityGuideConfig;
pub use error::CityGuideError;
pub use geolocation::{GeolocationError, PositionProvider, request_position};
pub use models::{AnnotationMap, Coordinates, Position, Site, VisitedSet};
pub use state::{AppState, FjallStore, MemoryStore, Session, StateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CityGuideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
