//! The in-progress clinic registration record.

use serde::{Deserialize, Serialize};

pub use clinic_onboard_api::{
    Accessibility, Address, AppointmentConfig, DaySchedule, EmergencyServices, Financials,
    HomeVisitConfig, InsuranceProvider, OperatingHours, Shift, SocialLinks, WeeklySchedule,
};

use crate::selection::{MultiSelect, MAX_SPECIALIZATIONS};
use crate::uploads::UploadTracker;

/// Phone number split into the picked country dial code and local digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneNumber {
    /// e.g. "+91"
    pub dial_code: String,
    /// Local number as typed
    pub number: String,
}

impl Default for PhoneNumber {
    fn default() -> Self {
        Self {
            dial_code: crate::selection::DEFAULT_COUNTRY.dial_code.to_string(),
            number: String::new(),
        }
    }
}

impl PhoneNumber {
    pub fn new(dial_code: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            dial_code: dial_code.into(),
            number: number.into(),
        }
    }

    /// Local number with separators stripped.
    pub fn digits(&self) -> String {
        self.number.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.number.trim().is_empty()
    }

    /// Number in `+<country><digits>` form.
    pub fn to_e164(&self) -> String {
        format!("{}{}", self.dial_code.trim(), self.digits())
    }
}

/// Accepted insurance providers.
///
/// Providers are appended, never merged by name. Each provider owns its
/// policy types, so removing a provider drops them with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsuranceList {
    providers: Vec<InsuranceProvider>,
}

impl InsuranceList {
    /// Append a provider. Returns its index, or `None` for a blank name.
    pub fn add_provider(&mut self, name: &str) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.providers.push(InsuranceProvider {
            provider: name.to_string(),
            policy_types: Vec::new(),
        });
        Some(self.providers.len() - 1)
    }

    /// Remove a provider together with all of its policy types.
    pub fn remove_provider(&mut self, index: usize) -> Option<InsuranceProvider> {
        if index < self.providers.len() {
            Some(self.providers.remove(index))
        } else {
            None
        }
    }

    /// Append a policy type to a provider. Blank values are ignored.
    pub fn add_policy_type(&mut self, provider_index: usize, policy: &str) -> bool {
        let policy = policy.trim();
        match self.providers.get_mut(provider_index) {
            Some(provider) if !policy.is_empty() => {
                provider.policy_types.push(policy.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn remove_policy_type(&mut self, provider_index: usize, policy_index: usize) -> Option<String> {
        let provider = self.providers.get_mut(provider_index)?;
        if policy_index < provider.policy_types.len() {
            Some(provider.policy_types.remove(policy_index))
        } else {
            None
        }
    }

    pub fn providers(&self) -> &[InsuranceProvider] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// A clinic registration being filled in across the wizard steps.
///
/// Created empty when the wizard starts and discarded on cancel or after a
/// successful submission. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrationDraft {
    // Identity
    pub name: String,
    pub description: String,
    pub phone: PhoneNumber,
    pub email: String,
    pub website: String,
    pub consultation_fee: Option<f64>,

    pub address: Address,
    pub accessibility: Accessibility,
    pub emergency_services: EmergencyServices,

    pub facilities: MultiSelect,
    pub specializations: MultiSelect,
    pub insurance: InsuranceList,

    pub social_links: SocialLinks,
    pub financials: Financials,
    pub appointment_config: AppointmentConfig,
    pub home_visit_config: HomeVisitConfig,
    pub operating_hours: OperatingHours,

    /// Picked photos; index 0 is the cover
    pub images: UploadTracker,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::with_max_images(crate::uploads::MAX_IMAGES)
    }

    /// Empty draft with a lower image cap (never above [`crate::uploads::MAX_IMAGES`]).
    pub fn with_max_images(max_images: usize) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            phone: PhoneNumber::default(),
            email: String::new(),
            website: String::new(),
            consultation_fee: None,
            address: Address::default(),
            accessibility: Accessibility::default(),
            emergency_services: EmergencyServices::default(),
            facilities: MultiSelect::new(),
            specializations: MultiSelect::with_max(MAX_SPECIALIZATIONS),
            insurance: InsuranceList::default(),
            social_links: SocialLinks::default(),
            financials: Financials::default(),
            appointment_config: AppointmentConfig::default(),
            home_visit_config: HomeVisitConfig::default(),
            operating_hours: OperatingHours::default(),
            images: UploadTracker::with_max(max_images),
        }
    }
}
