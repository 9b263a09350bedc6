//! Per-site notes the visitor attaches to catalog entries

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{CityGuideError, Result};

/// Personal rating from 1 to 5 stars
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(CityGuideError::validation(format!(
                "rating must be between {} and {}, got {stars}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    #[must_use]
    pub fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = CityGuideError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Priority flag and personal rating for one site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnnotation {
    #[serde(default)]
    pub is_priority: bool,
    #[serde(default, rename = "userRating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl UserAnnotation {
    /// An annotation equal to the default carries no information
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Annotations keyed by site id. Missing entries mean "not priority, no rating".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationMap {
    entries: HashMap<String, UserAnnotation>,
}

impl AnnotationMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotation for `site_id`, falling back to defaults
    #[must_use]
    pub fn get(&self, site_id: &str) -> UserAnnotation {
        self.entries.get(site_id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_priority(&self, site_id: &str) -> bool {
        self.entries.get(site_id).is_some_and(|a| a.is_priority)
    }

    /// Returns true if the stored annotation changed
    pub fn set_priority(&mut self, site_id: &str, is_priority: bool) -> bool {
        self.update(site_id, |annotation| annotation.is_priority = is_priority)
    }

    /// Returns true if the stored annotation changed
    pub fn set_rating(&mut self, site_id: &str, rating: Option<Rating>) -> bool {
        self.update(site_id, |annotation| annotation.rating = rating)
    }

    fn update(&mut self, site_id: &str, change: impl FnOnce(&mut UserAnnotation)) -> bool {
        let before = self.get(site_id);
        let mut after = before;
        change(&mut after);

        if after.is_default() {
            self.entries.remove(site_id);
        } else {
            self.entries.insert(site_id.to_string(), after);
        }
        after != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, UserAnnotation)> for AnnotationMap {
    fn from_iter<I: IntoIterator<Item = (String, UserAnnotation)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .filter(|(_, annotation)| !annotation.is_default())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(3, true)]
    #[case(5, true)]
    #[case(6, false)]
    fn test_rating_range(#[case] stars: u8, #[case] ok: bool) {
        assert_eq!(Rating::new(stars).is_ok(), ok);
    }

    #[test]
    fn test_absent_annotation_defaults() {
        let annotations = AnnotationMap::new();
        let a = annotations.get("real-alcazar");
        assert!(!a.is_priority);
        assert!(a.rating.is_none());
        assert!(!annotations.is_priority("real-alcazar"));
    }

    #[test]
    fn test_default_annotations_are_dropped() {
        let mut annotations = AnnotationMap::new();
        assert!(annotations.set_priority("giralda", true));
        assert!(annotations.set_rating("giralda", Some(Rating::new(4).unwrap())));
        assert_eq!(annotations.len(), 1);

        assert!(annotations.set_priority("giralda", false));
        assert_eq!(annotations.len(), 1);
        assert!(annotations.set_rating("giralda", None));
        assert!(annotations.is_empty());
        assert!(!annotations.set_rating("giralda", None));
    }

    #[test]
    fn test_json_shape() {
        let mut annotations = AnnotationMap::new();
        annotations.set_priority("giralda", true);
        annotations.set_rating("giralda", Some(Rating::new(5).unwrap()));

        let value = serde_json::to_value(&annotations).unwrap();
        assert_eq!(value["giralda"]["isPriority"], true);
        assert_eq!(value["giralda"]["userRating"], 5);

        let parsed: AnnotationMap =
            serde_json::from_str(r#"{"triana": {"isPriority": true}}"#).unwrap();
        assert!(parsed.is_priority("triana"));
        assert!(parsed.get("triana").rating.is_none());
    }

    #[test]
    fn test_collect_skips_default_entries() {
        let annotations: AnnotationMap = [
            (
                "giralda".to_string(),
                UserAnnotation {
                    is_priority: true,
                    rating: None,
                },
            ),
            ("triana".to_string(), UserAnnotation::default()),
        ]
        .into_iter()
        .collect();
        assert_eq!(annotations.len(), 1);
        assert!(annotations.is_priority("giralda"));
    }

    #[test]
    fn test_out_of_range_rating_rejected_on_load() {
        let parsed = serde_json::from_str::<AnnotationMap>(r#"{"triana": {"userRating": 9}}"#);
        assert!(parsed.is_err());
    }
}
