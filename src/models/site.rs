//! Site catalog records and their descriptive attributes

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coordinates;
use crate::{CityGuideError, Result};

/// A point of interest in the city catalog. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub duration: VisitDuration,
    pub crowd_level: CrowdLevel,
    pub rating: f64,
    pub popularity: Popularity,
    pub category: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

impl CrowdLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CrowdLevel::Low => "low",
            CrowdLevel::Medium => "medium",
            CrowdLevel::High => "high",
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Popularity {
    MustSee,
    Popular,
    HiddenGem,
}

impl Popularity {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Popularity::MustSee => "Must-See",
            Popularity::Popular => "Popular",
            Popularity::HiddenGem => "Hidden Gem",
        }
    }
}

impl fmt::Display for Popularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Expected visit duration.
///
/// Keeps the free-text band shown to visitors (e.g. `"1-2 hours"`) next to
/// the minute range it denotes. `max_minutes` is `None` for open-ended
/// bands such as `"3+ hours"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VisitDuration {
    label: String,
    min_minutes: u32,
    max_minutes: Option<u32>,
}

impl VisitDuration {
    /// Parse a duration band like `"30-45 min"`, `"1 hour"`, `"1-1.5 hours"` or `"3+ hours"`
    pub fn parse(label: &str) -> Result<Self> {
        let normalized = label.trim().to_lowercase();
        let invalid =
            || CityGuideError::validation(format!("unrecognized duration band '{label}'"));

        let unit_start = normalized
            .find(|c: char| c.is_alphabetic())
            .ok_or_else(invalid)?;
        let (amount, unit) = normalized.split_at(unit_start);

        let factor = match unit.trim() {
            "min" | "mins" | "minute" | "minutes" => 1.0,
            "h" | "hr" | "hrs" | "hour" | "hours" => 60.0,
            _ => return Err(invalid()),
        };

        let to_minutes = |text: &str| -> Result<u32> {
            let value: f64 = text.trim().parse().map_err(|_| invalid())?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid());
            }
            // bounded by the check above and realistic band sizes
            Ok((value * factor).round() as u32)
        };

        let amount = amount.trim();
        let (min_minutes, max_minutes) = if let Some(open) = amount.strip_suffix('+') {
            (to_minutes(open)?, None)
        } else if let Some((low, high)) = amount.split_once(['-', '–']) {
            (to_minutes(low)?, Some(to_minutes(high)?))
        } else {
            let exact = to_minutes(amount)?;
            (exact, Some(exact))
        };

        if max_minutes.is_some_and(|max| max < min_minutes) {
            return Err(invalid());
        }

        Ok(Self {
            label: label.trim().to_string(),
            min_minutes,
            max_minutes,
        })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn min_minutes(&self) -> u32 {
        self.min_minutes
    }

    #[must_use]
    pub fn max_minutes(&self) -> Option<u32> {
        self.max_minutes
    }

    /// True when the whole band fits within `minutes`. Open-ended bands never fit.
    #[must_use]
    pub fn fits_within(&self, minutes: u32) -> bool {
        self.max_minutes.is_some_and(|max| max <= minutes)
    }
}

impl TryFrom<String> for VisitDuration {
    type Error = CityGuideError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<VisitDuration> for String {
    fn from(value: VisitDuration) -> Self {
        value.label
    }
}

impl fmt::Display for VisitDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn site(id: &str, duration: &str, crowd: CrowdLevel, popularity: Popularity) -> Site {
        Site {
            id: id.to_string(),
            name: id.replace('-', " "),
            description: String::new(),
            image: String::new(),
            duration: VisitDuration::parse(duration).unwrap(),
            crowd_level: crowd,
            rating: 4.5,
            popularity,
            category: "Landmark".to_string(),
            coordinates: Coordinates {
                latitude: 37.3886,
                longitude: -5.9953,
            },
        }
    }
}
