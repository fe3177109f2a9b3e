//! Applied exercise filters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Filter category name -> selected option ids, in selection order.
///
/// Categories with no selected option are never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AppliedFilters(BTreeMap<String, Vec<String>>);

impl AppliedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, category: &str, option_id: &str) -> bool {
        self.0
            .get(category)
            .is_some_and(|ids| ids.iter().any(|id| id == option_id))
    }

    /// Flip one option. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, category: &str, option_id: &str) -> bool {
        let ids = self.0.entry(category.to_string()).or_default();
        let selected = if let Some(pos) = ids.iter().position(|id| id == option_id) {
            ids.remove(pos);
            false
        } else {
            ids.push(option_id.to_string());
            true
        };
        if ids.is_empty() {
            self.0.remove(category);
        }
        selected
    }

    pub fn selected(&self, category: &str) -> &[String] {
        self.0.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of selected options across categories.
    pub fn count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Keep only selections accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        for (category, ids) in self.0.iter_mut() {
            ids.retain(|id| keep(category, id));
        }
        self.0.retain(|_, ids| !ids.is_empty());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Query pairs for the exercise search endpoint (`bodyPart=knee,hip`).
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(category, ids)| (category.clone(), ids.join(",")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut filters = AppliedFilters::new();
        assert!(filters.toggle("bodyPart", "knee"));
        assert!(filters.toggle("bodyPart", "hip"));
        assert!(filters.is_selected("bodyPart", "knee"));
        assert_eq!(filters.count(), 2);

        assert!(!filters.toggle("bodyPart", "knee"));
        assert_eq!(filters.selected("bodyPart"), ["hip".to_string()]);
    }

    #[test]
    fn test_empty_category_removed() {
        let mut filters = AppliedFilters::new();
        filters.toggle("difficulty", "easy");
        filters.toggle("difficulty", "easy");
        assert!(filters.is_empty());
        assert!(filters.selected("difficulty").is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut filters = AppliedFilters::new();
        filters.toggle("equipment", "band");
        let json = serde_json::to_string(&filters).unwrap();
        assert_eq!(json, r#"{"equipment":["band"]}"#);

        let back: AppliedFilters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filters);
    }

    #[test]
    fn test_query_pairs() {
        let mut filters = AppliedFilters::new();
        filters.toggle("bodyPart", "knee");
        filters.toggle("bodyPart", "hip");
        filters.toggle("difficulty", "easy");
        assert_eq!(
            filters.to_query_pairs(),
            vec![
                ("bodyPart".to_string(), "knee,hip".to_string()),
                ("difficulty".to_string(), "easy".to_string()),
            ]
        );
    }
}
