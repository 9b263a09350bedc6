use serde::Serialize;

use super::filter::VisitFilter;
use crate::models::{AnnotationMap, Site, VisitedSet};

/// How much of the catalog has been visited
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub visited: usize,
    pub total: usize,
    pub percentage: f64,
}

impl Progress {
    #[must_use]
    pub fn new(visited: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            visited as f64 / total as f64 * 100.0
        };
        Self {
            visited,
            total,
            percentage,
        }
    }

    /// Only ids present in `sites` count; stale ids in the visited set are ignored.
    #[must_use]
    pub fn compute(sites: &[Site], visited: &VisitedSet) -> Self {
        let count = sites.iter().filter(|s| visited.contains(&s.id)).count();
        Self::new(count, sites.len())
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.visited)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.visited >= self.total
    }
}

/// Number of sites each visit filter would show, for filter labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub visited: usize,
    pub unvisited: usize,
    pub priority: usize,
}

impl FilterCounts {
    #[must_use]
    pub fn compute(
        sites: &[Site],
        visited: &VisitedSet,
        annotations: Option<&AnnotationMap>,
    ) -> Self {
        sites.iter().fold(Self::default(), |mut counts, site| {
            counts.all += 1;
            if visited.contains(&site.id) {
                counts.visited += 1;
            } else {
                counts.unvisited += 1;
            }
            if VisitFilter::Priority.matches(site, visited, annotations) {
                counts.priority += 1;
            }
            counts
        })
    }

    #[must_use]
    pub fn get(&self, mode: VisitFilter) -> usize {
        match mode {
            VisitFilter::All => self.all,
            VisitFilter::Visited => self.visited,
            VisitFilter::Unvisited => self.unvisited,
            VisitFilter::Priority => self.priority,
        }
    }
}
