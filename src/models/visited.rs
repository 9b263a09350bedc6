use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifiers of the sites the visitor has marked as visited.
///
/// Stored as a JSON array of ids. Serialization is sorted so that saving an
/// unchanged set always produces the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct VisitedSet {
    ids: HashSet<String>,
}

impl VisitedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, site_id: &str) -> bool {
        self.ids.contains(site_id)
    }

    /// Flip the visited state of `site_id`. Returns true if it is now visited.
    pub fn toggle(&mut self, site_id: &str) -> bool {
        if self.ids.remove(site_id) {
            false
        } else {
            self.ids.insert(site_id.to_string());
            true
        }
    }

    /// Returns true if the set changed
    pub fn set(&mut self, site_id: &str, visited: bool) -> bool {
        if visited {
            self.ids.insert(site_id.to_string())
        } else {
            self.ids.remove(site_id)
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for VisitedSet {
    fn from(ids: Vec<String>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

impl From<VisitedSet> for Vec<String> {
    fn from(set: VisitedSet) -> Self {
        let mut ids: Vec<String> = set.ids.into_iter().collect();
        ids.sort();
        ids
    }
}

impl<S: Into<String>> FromIterator<S> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores() {
        let mut visited = VisitedSet::new();
        assert!(visited.toggle("real-alcazar"));
        assert!(visited.contains("real-alcazar"));
        assert!(!visited.toggle("real-alcazar"));
        assert!(visited.is_empty());
    }

    #[test]
    fn test_set_reports_change() {
        let mut visited = VisitedSet::new();
        assert!(visited.set("giralda", true));
        assert!(!visited.set("giralda", true));
        assert!(visited.set("giralda", false));
        assert!(!visited.set("giralda", false));
    }

    #[test]
    fn test_json_is_sorted_array() {
        let visited: VisitedSet = ["torre-del-oro", "giralda", "real-alcazar"]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&visited).unwrap();
        assert_eq!(json, r#"["giralda","real-alcazar","torre-del-oro"]"#);

        let back: VisitedSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, visited);
    }
}
