//! Display preferences: interface language and color theme

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CityGuideError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Fr,
    Es,
    Zh,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::De,
        Language::Fr,
        Language::Es,
        Language::Zh,
    ];

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::Zh => "zh",
        }
    }

    /// Pick the interface language.
    ///
    /// A supported stored choice wins, then the primary subtag of the system
    /// locale (`"de-AT"` -> German), then English.
    #[must_use]
    pub fn detect(stored: Option<&str>, locale: Option<&str>) -> Self {
        if let Some(language) = stored.and_then(|s| s.parse().ok()) {
            return language;
        }

        locale
            .and_then(|l| l.split(['-', '_', '.']).next())
            .and_then(|primary| primary.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for Language {
    type Err = CityGuideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CityGuideError::validation(format!("unsupported language '{s}'")))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
