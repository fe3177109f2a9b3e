//! Exercise filter sheet.
//!
//! The sheet edits a working copy of the applied filters. Nothing reaches
//! the caller until [`FilterSheet::confirm`]; [`FilterSheet::cancel`] drops
//! the working copy.

use clinic_onboard_api::{ApiResult, ClinicApi, FilterCategory};
use thiserror::Error;

use crate::models::AppliedFilters;

/// Filter sheet errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter category: {0}")]
    UnknownCategory(String),

    #[error("Unknown option {option} in category {category}")]
    UnknownOption { category: String, option: String },
}

/// An open filter sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSheet {
    categories: Vec<FilterCategory>,
    working: AppliedFilters,
}

impl FilterSheet {
    /// Fetch the available filters and seed the sheet with `initial`.
    pub async fn open(api: &dyn ClinicApi, initial: AppliedFilters) -> ApiResult<Self> {
        let categories = api.get_exercise_filters().await?;
        tracing::debug!(categories = categories.len(), "filter sheet opened");
        Ok(Self::from_categories(categories, initial))
    }

    /// Build a sheet from already-fetched categories.
    ///
    /// Seeded selections that no longer exist on the server are dropped.
    pub fn from_categories(categories: Vec<FilterCategory>, initial: AppliedFilters) -> Self {
        let mut working = initial;
        working.retain(|category, option| {
            categories
                .iter()
                .any(|c| c.name == category && c.options.iter().any(|o| o.id == option))
        });
        Self {
            categories,
            working,
        }
    }

    pub fn categories(&self) -> &[FilterCategory] {
        &self.categories
    }

    pub fn selected(&self) -> &AppliedFilters {
        &self.working
    }

    pub fn is_selected(&self, category: &str, option_id: &str) -> bool {
        self.working.is_selected(category, option_id)
    }

    /// Flip one option. Returns whether it is now selected.
    pub fn toggle(&mut self, category: &str, option_id: &str) -> Result<bool, FilterError> {
        let found = self
            .categories
            .iter()
            .find(|c| c.name == category)
            .ok_or_else(|| FilterError::UnknownCategory(category.to_string()))?;
        if !found.options.iter().any(|o| o.id == option_id) {
            return Err(FilterError::UnknownOption {
                category: category.to_string(),
                option: option_id.to_string(),
            });
        }
        Ok(self.working.toggle(category, option_id))
    }

    pub fn clear(&mut self) {
        self.working.clear();
    }

    /// Close the sheet, applying the selection.
    pub fn confirm(self) -> AppliedFilters {
        tracing::debug!(selected = self.working.count(), "filters applied");
        self.working
    }

    /// Close the sheet without applying anything.
    pub fn cancel(self) {
        tracing::debug!("filter sheet dismissed");
    }
}
