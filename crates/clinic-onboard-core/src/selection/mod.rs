//! Multi-select chips, fixed vocabularies and the country-code picker.

mod countries;
mod vocabulary;

pub use countries::*;
pub use vocabulary::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selection errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

/// Outcome of a [`MultiSelect::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
    /// Addition dropped because the selection is full
    Ignored,
}

/// Ordered set of selected string tags with an optional size bound.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MultiSelect {
    selected: Vec<String>,
    max_selections: Option<usize>,
}

impl MultiSelect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max(max_selections: usize) -> Self {
        Self {
            selected: Vec::new(),
            max_selections: Some(max_selections),
        }
    }

    /// Add `option` if absent, remove it if present.
    ///
    /// When the bound is reached an addition is a silent no-op.
    pub fn toggle(&mut self, option: &str) -> SelectionChange {
        if let Some(pos) = self.selected.iter().position(|s| s == option) {
            self.selected.remove(pos);
            return SelectionChange::Removed;
        }
        if self.is_full() {
            return SelectionChange::Ignored;
        }
        self.selected.push(option.to_string());
        SelectionChange::Added
    }

    /// Toggle an option that must belong to `vocabulary`.
    pub fn toggle_known(
        &mut self,
        option: &str,
        vocabulary: &[&str],
    ) -> Result<SelectionChange, SelectionError> {
        if !vocabulary.contains(&option) {
            return Err(SelectionError::UnknownOption(option.to_string()));
        }
        Ok(self.toggle(option))
    }

    pub fn contains(&self, option: &str) -> bool {
        self.selected.iter().any(|s| s == option)
    }

    pub fn is_full(&self) -> bool {
        self.max_selections
            .is_some_and(|max| self.selected.len() >= max)
    }

    pub fn max_selections(&self) -> Option<usize> {
        self.max_selections
    }

    /// Selected options in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.selected
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.selected.clone()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let mut select = MultiSelect::new();
        select.toggle("Wi-Fi");
        select.toggle("Parking");
        select.toggle("Pharmacy");
        assert_eq!(select.as_slice(), ["Wi-Fi", "Parking", "Pharmacy"]);

        assert_eq!(select.toggle("Parking"), SelectionChange::Removed);
        assert_eq!(select.as_slice(), ["Wi-Fi", "Pharmacy"]);
    }

    #[test]
    fn test_max_selections_ignores_additions() {
        let mut select = MultiSelect::with_max(2);
        assert_eq!(select.toggle("a"), SelectionChange::Added);
        assert_eq!(select.toggle("b"), SelectionChange::Added);
        assert_eq!(select.toggle("c"), SelectionChange::Ignored);
        assert_eq!(select.len(), 2);
        assert!(!select.contains("c"));

        // Removal is still allowed when full
        assert_eq!(select.toggle("a"), SelectionChange::Removed);
        assert_eq!(select.toggle("c"), SelectionChange::Added);
    }

    #[test]
    fn test_toggle_known_rejects_unknown() {
        let mut select = MultiSelect::new();
        let err = select.toggle_known("Helipad", FACILITIES).unwrap_err();
        assert_eq!(err, SelectionError::UnknownOption("Helipad".into()));
        assert!(select.is_empty());

        assert_eq!(
            select.toggle_known("Parking", FACILITIES),
            Ok(SelectionChange::Added)
        );
    }
}
