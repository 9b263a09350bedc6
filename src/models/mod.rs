//! Data models for the CityGuide library
//!
//! This module contains the core domain models organized by concern:
//! - Site: Catalog records, duration bands, crowd and popularity tiers
//! - Coordinates / Position: Geographic points and geolocation fixes
//! - Visited / Annotation: What the visitor has recorded about each site
//! - Preferences: Interface language and theme

pub mod annotation;
pub mod coordinates;
pub mod position;
pub mod preferences;
pub mod site;
pub mod visited;

// Re-export all public types for convenient access
pub use annotation::{AnnotationMap, Rating, UserAnnotation};
pub use coordinates::Coordinates;
pub use position::Position;
pub use preferences::{Language, Theme};
pub use site::{CrowdLevel, Popularity, Site, VisitDuration};
pub use visited::VisitedSet;
