//! Catalog Loading Module
//!
//! This module handles loading site catalogs, either from the catalogs
//! bundled with the crate or from a JSON file on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use super::Catalog;
use crate::models::{Coordinates, Site};
use crate::{CityGuideError, Result};

const SEVILLA_JSON: &str = include_str!("../../data/sevilla.json");
const KOLN_JSON: &str = include_str!("../../data/koln.json");

/// Catalogs shipped with the crate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinCity {
    #[default]
    Sevilla,
    Koln,
}

impl BuiltinCity {
    fn source(self) -> &'static str {
        match self {
            BuiltinCity::Sevilla => SEVILLA_JSON,
            BuiltinCity::Koln => KOLN_JSON,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinCity::Sevilla => "sevilla",
            BuiltinCity::Koln => "koln",
        }
    }
}

impl FromStr for BuiltinCity {
    type Err = CityGuideError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sevilla" | "seville" => Ok(BuiltinCity::Sevilla),
            "koln" | "köln" | "cologne" => Ok(BuiltinCity::Koln),
            other => Err(CityGuideError::validation(format!(
                "unknown built-in city '{other}'"
            ))),
        }
    }
}

impl fmt::Display for BuiltinCity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk catalog layout
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    pub city: String,
    pub center: Coordinates,
    pub sites: Vec<Site>,
}

/// Loads and validates site catalogs
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load one of the bundled catalogs
    pub fn load_builtin(city: BuiltinCity) -> Result<Catalog> {
        debug!("Loading built-in catalog for {}", city);
        Self::from_json(city.source())
    }

    /// Load a catalog from a JSON file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CityGuideError::catalog(format!(
                "catalog file not found: {}",
                path.display()
            )));
        }

        debug!("Loading catalog from file: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Catalog> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| CityGuideError::catalog(format!("malformed catalog: {e}")))?;

        let catalog = Catalog::new(file.city, file.center, file.sites)?;
        info!(
            "Loaded {} sites for {}",
            catalog.len(),
            catalog.city()
        );
        Ok(catalog)
    }
}
