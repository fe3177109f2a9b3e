//! Registration wizard steps.

use serde::{Deserialize, Serialize};

/// Ordered steps of the clinic registration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    BasicInfo,
    Location,
    Accessibility,
    Financials,
    SocialLinks,
    Specializations,
    FacilitiesGallery,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 8] = [
        WizardStep::BasicInfo,
        WizardStep::Location,
        WizardStep::Accessibility,
        WizardStep::Financials,
        WizardStep::SocialLinks,
        WizardStep::Specializations,
        WizardStep::FacilitiesGallery,
        WizardStep::Review,
    ];

    pub const FIRST: WizardStep = WizardStep::BasicInfo;
    pub const LAST: WizardStep = WizardStep::Review;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    /// Stable identifier used across the FFI boundary.
    pub fn key(self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "basic_info",
            WizardStep::Location => "location",
            WizardStep::Accessibility => "accessibility",
            WizardStep::Financials => "financials",
            WizardStep::SocialLinks => "social_links",
            WizardStep::Specializations => "specializations",
            WizardStep::FacilitiesGallery => "facilities_gallery",
            WizardStep::Review => "review",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "Basic Info",
            WizardStep::Location => "Location",
            WizardStep::Accessibility => "Accessibility",
            WizardStep::Financials => "Financials",
            WizardStep::SocialLinks => "Social Links",
            WizardStep::Specializations => "Specializations",
            WizardStep::FacilitiesGallery => "Facilities & Gallery",
            WizardStep::Review => "Review",
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::FIRST
    }
}

/// How the step indicator renders a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

/// Indicator state for every step, relative to `current`.
pub fn indicator(current: WizardStep) -> Vec<(WizardStep, StepState)> {
    WizardStep::ALL
        .into_iter()
        .map(|step| {
            let state = match step.cmp(&current) {
                std::cmp::Ordering::Less => StepState::Completed,
                std::cmp::Ordering::Equal => StepState::Current,
                std::cmp::Ordering::Greater => StepState::Upcoming,
            };
            (step, state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_bounds() {
        assert_eq!(WizardStep::FIRST.index(), 0);
        assert_eq!(WizardStep::LAST.index(), WizardStep::ALL.len() - 1);
        assert_eq!(WizardStep::BasicInfo.prev(), None);
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::BasicInfo.next(), Some(WizardStep::Location));
        for (i, step) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(WizardStep::from_index(i), Some(*step));
        }
    }

    #[test]
    fn test_keys_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_key(step.key()), Some(step));
        }
        assert_eq!(WizardStep::from_key("payment"), None);
    }

    #[test]
    fn test_indicator() {
        let states = indicator(WizardStep::Financials);
        assert_eq!(states[0].1, StepState::Completed);
        assert_eq!(states[2].1, StepState::Completed);
        assert_eq!(states[3], (WizardStep::Financials, StepState::Current));
        assert_eq!(states[7].1, StepState::Upcoming);
    }
}
