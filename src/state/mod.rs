//! Application state and its persistence
//!
//! [`AppState`] is plain data handed by reference to the pure filter and
//! proximity functions. [`Session`] owns it together with a [`StateStore`]:
//! everything is loaded once on open and each mutation saves the key it
//! touched.

pub mod store;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, FilterCounts, Progress};
use crate::geolocation::GeolocationError;
use crate::models::{
    AnnotationMap, Language, Position, Rating, Theme, UserAnnotation, VisitedSet,
};
use crate::Result;

pub use store::{FjallStore, MemoryStore, StateStore};

pub const VISITED_SITES_KEY: &str = "visited-sites";
pub const USER_SITE_DATA_KEY: &str = "user-site-data";
pub const LANGUAGE_KEY: &str = "language";
pub const THEME_KEY: &str = "theme";
pub const FIRST_VISIT_KEY: &str = "first-visit";

/// Everything the visitor has chosen or recorded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub visited: VisitedSet,
    pub annotations: AnnotationMap,
    /// Present only after a successful geolocation request; never persisted
    pub position: Option<Position>,
    pub language: Language,
    pub theme: Theme,
    pub onboarding_complete: bool,
}

impl AppState {
    #[must_use]
    pub fn progress(&self, catalog: &Catalog) -> Progress {
        Progress::compute(catalog.sites(), &self.visited)
    }

    #[must_use]
    pub fn filter_counts(&self, catalog: &Catalog) -> FilterCounts {
        FilterCounts::compute(catalog.sites(), &self.visited, Some(&self.annotations))
    }
}

/// Application state bound to a persistence strategy
pub struct Session<S: StateStore> {
    state: AppState,
    store: S,
}

impl<S: StateStore> Session<S> {
    /// Load all persisted state from `store`.
    ///
    /// Missing keys fall back to defaults, as do values that no longer
    /// decode. Unreadable annotations are dropped one site at a time. Only
    /// failures of the store itself are errors.
    pub fn open(store: S) -> Result<Self> {
        let state = AppState {
            visited: load_or_default(&store, VISITED_SITES_KEY)?,
            annotations: load_annotations(&store)?,
            position: None,
            language: load_or_default(&store, LANGUAGE_KEY)?,
            theme: load_or_default(&store, THEME_KEY)?,
            onboarding_complete: load_or_default(&store, FIRST_VISIT_KEY)?,
        };

        info!(
            "Session loaded: {} visited, {} annotated",
            state.visited.len(),
            state.annotations.len()
        );
        Ok(Self { state, store })
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flip a site's visited state. Returns true if it is now visited.
    pub fn toggle_visited(&mut self, site_id: &str) -> Result<bool> {
        let mut visited = self.state.visited.clone();
        let now_visited = visited.toggle(site_id);
        self.persist(VISITED_SITES_KEY, &visited)?;
        self.state.visited = visited;
        debug!(site_id, now_visited, "Toggled visit");
        Ok(now_visited)
    }

    pub fn set_visited(&mut self, site_id: &str, is_visited: bool) -> Result<()> {
        let mut visited = self.state.visited.clone();
        if visited.set(site_id, is_visited) {
            self.persist(VISITED_SITES_KEY, &visited)?;
            self.state.visited = visited;
        }
        Ok(())
    }

    pub fn clear_visited(&mut self) -> Result<()> {
        let cleared = VisitedSet::new();
        self.persist(VISITED_SITES_KEY, &cleared)?;
        self.state.visited = cleared;
        Ok(())
    }

    pub fn set_priority(&mut self, site_id: &str, is_priority: bool) -> Result<()> {
        let mut annotations = self.state.annotations.clone();
        if annotations.set_priority(site_id, is_priority) {
            self.persist(USER_SITE_DATA_KEY, &annotations)?;
            self.state.annotations = annotations;
        }
        Ok(())
    }

    /// Set a 1-5 rating, or clear it with `None`
    pub fn set_rating(&mut self, site_id: &str, stars: Option<u8>) -> Result<()> {
        let rating = stars.map(Rating::new).transpose()?;
        let mut annotations = self.state.annotations.clone();
        if annotations.set_rating(site_id, rating) {
            self.persist(USER_SITE_DATA_KEY, &annotations)?;
            self.state.annotations = annotations;
        }
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.persist(LANGUAGE_KEY, &language)?;
        self.state.language = language;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.state.theme.toggled();
        self.persist(THEME_KEY, &theme)?;
        self.state.theme = theme;
        Ok(theme)
    }

    pub fn complete_onboarding(&mut self) -> Result<()> {
        self.persist(FIRST_VISIT_KEY, &true)?;
        self.state.onboarding_complete = true;
        Ok(())
    }

    /// Take the outcome of a geolocation request. A failure clears the
    /// position so proximity falls back to "unknown distance".
    pub fn apply_position(&mut self, outcome: std::result::Result<Position, GeolocationError>) {
        match outcome {
            Ok(position) => self.state.position = Some(position),
            Err(e) => {
                warn!("Proximity disabled: {}", e);
                self.state.position = None;
            }
        }
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.store.save(key, &bytes)
    }
}

/// Decode `user-site-data` entry by entry so one bad record does not take
/// the others with it.
fn load_annotations(store: &impl StateStore) -> Result<AnnotationMap> {
    let raw: HashMap<String, serde_json::Value> = load_or_default(store, USER_SITE_DATA_KEY)?;

    let annotations = raw
        .into_iter()
        .filter_map(|(site_id, value)| {
            match serde_json::from_value::<UserAnnotation>(value) {
                Ok(annotation) => Some((site_id, annotation)),
                Err(e) => {
                    warn!("Dropping unreadable annotation for '{}': {}", site_id, e);
                    None
                }
            }
        })
        .collect();
    Ok(annotations)
}

fn load_or_default<T: DeserializeOwned + Default>(
    store: &impl StateStore,
    key: &str,
) -> Result<T> {
    let Some(bytes) = store.load(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Ignoring unreadable value under '{}': {}", key, e);
            Ok(T::default())
        }
    }
}
