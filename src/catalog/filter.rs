//! Visit-status and quick filtering of the site catalog
//!
//! Filtering is a pure function of the catalog, the visited set and the
//! annotations. Output always keeps catalog order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::progress::Progress;
use crate::models::{AnnotationMap, CrowdLevel, Popularity, Site, VisitedSet};
use crate::{CityGuideError, Result};

/// Which sites to show based on visit status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitFilter {
    #[default]
    All,
    Visited,
    Unvisited,
    Priority,
}

impl VisitFilter {
    pub const ALL: [VisitFilter; 4] = [
        VisitFilter::All,
        VisitFilter::Visited,
        VisitFilter::Unvisited,
        VisitFilter::Priority,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitFilter::All => "all",
            VisitFilter::Visited => "visited",
            VisitFilter::Unvisited => "unvisited",
            VisitFilter::Priority => "priority",
        }
    }

    /// Does `site` pass this visit-status filter.
    /// Sites without an annotation are never priority.
    #[must_use]
    pub fn matches(
        &self,
        site: &Site,
        visited: &VisitedSet,
        annotations: Option<&AnnotationMap>,
    ) -> bool {
        match self {
            VisitFilter::All => true,
            VisitFilter::Visited => visited.contains(&site.id),
            VisitFilter::Unvisited => !visited.contains(&site.id),
            VisitFilter::Priority => annotations.is_some_and(|a| a.is_priority(&site.id)),
        }
    }
}

impl FromStr for VisitFilter {
    type Err = CityGuideError;

    fn from_str(s: &str) -> Result<Self> {
        VisitFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| CityGuideError::validation(format!("unknown filter '{s}'")))
    }
}

impl fmt::Display for VisitFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary predicates layered on top of the visit filter. Combined with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickFilter {
    /// Whole visit fits in an hour
    QuickVisit,
    /// Whole visit fits in two hours
    ShortVisit,
    LessCrowded,
    MustSee,
    HiddenGems,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 5] = [
        QuickFilter::QuickVisit,
        QuickFilter::ShortVisit,
        QuickFilter::LessCrowded,
        QuickFilter::MustSee,
        QuickFilter::HiddenGems,
    ];

    const QUICK_VISIT_MINUTES: u32 = 60;
    const SHORT_VISIT_MINUTES: u32 = 120;

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuickFilter::QuickVisit => "quick-visit",
            QuickFilter::ShortVisit => "short-visit",
            QuickFilter::LessCrowded => "less-crowded",
            QuickFilter::MustSee => "must-see",
            QuickFilter::HiddenGems => "hidden-gems",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            QuickFilter::QuickVisit => "Less than 1 hour",
            QuickFilter::ShortVisit => "Less than 2 hours",
            QuickFilter::LessCrowded => "Low crowd level",
            QuickFilter::MustSee => "Top attractions",
            QuickFilter::HiddenGems => "Off the beaten path",
        }
    }

    #[must_use]
    pub fn matches(&self, site: &Site) -> bool {
        match self {
            QuickFilter::QuickVisit => site.duration.fits_within(Self::QUICK_VISIT_MINUTES),
            QuickFilter::ShortVisit => site.duration.fits_within(Self::SHORT_VISIT_MINUTES),
            QuickFilter::LessCrowded => site.crowd_level == CrowdLevel::Low,
            QuickFilter::MustSee => site.popularity == Popularity::MustSee,
            QuickFilter::HiddenGems => site.popularity == Popularity::HiddenGem,
        }
    }
}

impl FromStr for QuickFilter {
    type Err = CityGuideError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        QuickFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| CityGuideError::validation(format!("unknown quick filter '{s}'")))
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visit filter plus the active quick filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFilter {
    pub mode: VisitFilter,
    pub quick: BTreeSet<QuickFilter>,
}

impl SiteFilter {
    #[must_use]
    pub fn new(mode: VisitFilter) -> Self {
        Self {
            mode,
            quick: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_quick(mut self, filter: QuickFilter) -> Self {
        self.quick.insert(filter);
        self
    }

    /// Turn a quick filter on or off. Returns true if it is now active.
    pub fn toggle_quick(&mut self, filter: QuickFilter) -> bool {
        if self.quick.remove(&filter) {
            false
        } else {
            self.quick.insert(filter);
            true
        }
    }

    pub fn clear_quick(&mut self) {
        self.quick.clear();
    }

    #[must_use]
    pub fn active_quick_count(&self) -> usize {
        self.quick.len()
    }

    /// False only for the `all` mode with no quick filters
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode != VisitFilter::All || !self.quick.is_empty()
    }

    #[must_use]
    pub fn matches(
        &self,
        site: &Site,
        visited: &VisitedSet,
        annotations: Option<&AnnotationMap>,
    ) -> bool {
        self.mode.matches(site, visited, annotations)
            && self.quick.iter().all(|quick| quick.matches(site))
    }

    /// Stable subsequence of `sites` passing this filter
    #[must_use]
    pub fn apply<'a>(
        &self,
        sites: &'a [Site],
        visited: &VisitedSet,
        annotations: Option<&AnnotationMap>,
    ) -> FilteredSites<'a> {
        let matched: Vec<&Site> = sites
            .iter()
            .filter(|site| self.matches(site, visited, annotations))
            .collect();

        debug!(
            mode = %self.mode,
            quick = self.quick.len(),
            matched = matched.len(),
            total = sites.len(),
            "Applied site filter"
        );

        FilteredSites {
            sites: matched,
            filtered: self.is_active(),
        }
    }
}

/// Result of applying a [`SiteFilter`]
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSites<'a> {
    sites: Vec<&'a Site>,
    filtered: bool,
}

impl<'a> FilteredSites<'a> {
    #[must_use]
    pub fn sites(&self) -> &[&'a Site] {
        &self.sites
    }

    /// Whether any filter was in effect. Lets callers tell "nothing
    /// matched" apart from "nothing in the catalog".
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(|s| s.id.as_str())
    }
}

/// Why a filtered list came out empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Looking at visited sites before anything was visited
    NothingVisitedYet,
    /// Looking at unvisited sites after everything was visited
    AllVisited,
    NoMatch,
}

impl EmptyState {
    #[must_use]
    pub fn classify(mode: VisitFilter, progress: &Progress) -> Self {
        match mode {
            VisitFilter::Visited if progress.visited == 0 => EmptyState::NothingVisitedYet,
            VisitFilter::Unvisited if progress.is_complete() => EmptyState::AllVisited,
            _ => EmptyState::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::site::test_support::site;
    use rstest::rstest;

    fn sites() -> Vec<Site> {
        vec![
            site("alcazar", "2-3 hours", CrowdLevel::High, Popularity::MustSee),
            site("torre", "30-45 min", CrowdLevel::Medium, Popularity::Popular),
            site("pilatos", "1 hour", CrowdLevel::Low, Popularity::HiddenGem),
            site("museo", "1.5-2 hours", CrowdLevel::Low, Popularity::HiddenGem),
            site("triana", "3+ hours", CrowdLevel::Medium, Popularity::Popular),
        ]
    }

    fn ids(result: &FilteredSites<'_>) -> Vec<String> {
        result.ids().map(str::to_string).collect()
    }

    #[rstest]
    #[case(VisitFilter::All, &["alcazar", "torre", "pilatos", "museo", "triana"])]
    #[case(VisitFilter::Visited, &["torre", "museo"])]
    #[case(VisitFilter::Unvisited, &["alcazar", "pilatos", "triana"])]
    #[case(VisitFilter::Priority, &["pilatos"])]
    fn test_visit_filter_modes(#[case] mode: VisitFilter, #[case] expected: &[&str]) {
        let sites = sites();
        let visited: VisitedSet = ["museo", "torre", "ghost"].into_iter().collect();
        let mut annotations = AnnotationMap::new();
        annotations.set_priority("pilatos", true);
        annotations.set_priority("ghost", true);

        let result = SiteFilter::new(mode).apply(&sites, &visited, Some(&annotations));
        assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_priority_without_annotations_is_empty() {
        let sites = sites();
        let result =
            SiteFilter::new(VisitFilter::Priority).apply(&sites, &VisitedSet::new(), None);
        assert!(result.is_empty());
        assert!(result.is_filtered());
    }

    #[rstest]
    #[case(QuickFilter::QuickVisit, &["torre", "pilatos"])]
    #[case(QuickFilter::ShortVisit, &["torre", "pilatos", "museo"])]
    #[case(QuickFilter::LessCrowded, &["pilatos", "museo"])]
    #[case(QuickFilter::MustSee, &["alcazar"])]
    #[case(QuickFilter::HiddenGems, &["pilatos", "museo"])]
    fn test_quick_filters(#[case] quick: QuickFilter, #[case] expected: &[&str]) {
        let sites = sites();
        let result = SiteFilter::default()
            .with_quick(quick)
            .apply(&sites, &VisitedSet::new(), None);
        assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_quick_filters_combine_with_and() {
        let sites = sites();
        let visited: VisitedSet = ["pilatos"].into_iter().collect();
        let filter = SiteFilter::new(VisitFilter::Unvisited)
            .with_quick(QuickFilter::LessCrowded)
            .with_quick(QuickFilter::HiddenGems);

        let result = filter.apply(&sites, &visited, None);
        assert_eq!(ids(&result), ["museo"]);
    }

    #[test]
    fn test_toggle_and_clear_quick_filters() {
        let mut filter = SiteFilter::default();
        assert!(!filter.is_active());
        assert!(filter.toggle_quick(QuickFilter::MustSee));
        assert!(filter.is_active());
        assert_eq!(filter.active_quick_count(), 1);
        assert!(!filter.toggle_quick(QuickFilter::MustSee));
        assert!(!filter.is_active());

        filter.toggle_quick(QuickFilter::QuickVisit);
        filter.toggle_quick(QuickFilter::LessCrowded);
        filter.clear_quick();
        assert_eq!(filter.active_quick_count(), 0);
    }

    #[test]
    fn test_unfiltered_empty_catalog_is_not_filtered() {
        let result = SiteFilter::default().apply(&[], &VisitedSet::new(), None);
        assert!(result.is_empty());
        assert!(!result.is_filtered());
    }

    #[test]
    fn test_visited_and_unvisited_partition() {
        let sites = sites();
        let visited: VisitedSet = ["alcazar", "triana"].into_iter().collect();
        let seen = SiteFilter::new(VisitFilter::Visited).apply(&sites, &visited, None);
        let unseen = SiteFilter::new(VisitFilter::Unvisited).apply(&sites, &visited, None);

        assert_eq!(seen.len() + unseen.len(), sites.len());
        assert!(seen.ids().all(|id| !unseen.ids().any(|other| other == id)));
    }

    #[test]
    fn test_same_inputs_same_output() {
        let sites = sites();
        let visited: VisitedSet = ["torre"].into_iter().collect();
        let filter = SiteFilter::new(VisitFilter::Unvisited).with_quick(QuickFilter::ShortVisit);
        assert_eq!(
            filter.apply(&sites, &visited, None),
            filter.apply(&sites, &visited, None)
        );
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("unvisited".parse::<VisitFilter>().unwrap(), VisitFilter::Unvisited);
        assert_eq!(
            "hidden-gems".parse::<QuickFilter>().unwrap(),
            QuickFilter::HiddenGems
        );
        assert!("sometimes".parse::<VisitFilter>().is_err());
        assert!("cheap".parse::<QuickFilter>().is_err());
    }

    #[rstest]
    #[case(VisitFilter::Visited, 0, 12, EmptyState::NothingVisitedYet)]
    #[case(VisitFilter::Unvisited, 12, 12, EmptyState::AllVisited)]
    #[case(VisitFilter::Visited, 3, 12, EmptyState::NoMatch)]
    #[case(VisitFilter::All, 0, 0, EmptyState::NoMatch)]
    #[case(VisitFilter::Priority, 0, 12, EmptyState::NoMatch)]
    fn test_empty_state(
        #[case] mode: VisitFilter,
        #[case] visited: usize,
        #[case] total: usize,
        #[case] expected: EmptyState,
    ) {
        let progress = Progress::new(visited, total);
        assert_eq!(EmptyState::classify(mode, &progress), expected);
    }
}
