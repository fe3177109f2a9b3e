//! Per-step field validation.
//!
//! Validation never fails hard: it collects field -> message pairs the UI
//! shows inline next to each input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::WizardStep;
use crate::models::RegistrationDraft;

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;
const PINCODE_LEN: usize = 6;
const GSTIN_LEN: usize = 15;
const MAX_SLOT_MINUTES: u32 = 240;

/// Field-level validation failures, keyed by field path (e.g. `address.city`).
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[error("{} field(s) invalid", .0.len())]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First message per field wins
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.0.entry(field).or_insert(message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validate the fields owned by one step.
pub fn validate_step(step: WizardStep, draft: &RegistrationDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match step {
        WizardStep::BasicInfo => basic_info(draft, &mut errors),
        WizardStep::Location => location(draft, &mut errors),
        WizardStep::Accessibility => accessibility(draft, &mut errors),
        WizardStep::Financials => financials(draft, &mut errors),
        WizardStep::SocialLinks => social_links(draft, &mut errors),
        WizardStep::Specializations => {
            if draft.specializations.is_empty() {
                errors.add("specializations", "Select at least one specialization");
            }
        }
        WizardStep::FacilitiesGallery => {
            if draft.facilities.is_empty() {
                errors.add("facilities", "Select at least one facility");
            }
            if draft.images.is_empty() {
                errors.add("images", "Add at least one photo of the clinic");
            }
        }
        WizardStep::Review => {}
    }
    errors
}

/// Validate the whole draft before submission.
///
/// Every step's rules apply, and every photo must have finished uploading.
pub fn validate_draft(draft: &RegistrationDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for step in WizardStep::ALL {
        errors.merge(validate_step(step, draft));
    }
    if !draft.images.is_empty() && !draft.images.all_uploaded() {
        errors.add("images", "Some photos failed to upload; retry or remove them");
    }
    errors
}

fn basic_info(draft: &RegistrationDraft, errors: &mut ValidationErrors) {
    if draft.name.trim().is_empty() {
        errors.add("name", "Clinic name is required");
    }

    if draft.phone.is_empty() {
        errors.add("phone", "Phone number is required");
    } else if !is_valid_phone(&draft.phone.number) {
        errors.add("phone", "Enter a valid phone number");
    }

    let email = draft.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        errors.add("email", "Enter a valid email address");
    }

    let website = draft.website.trim();
    if !website.is_empty() && normalize_url(website).is_none() {
        errors.add("website", "Enter a valid website URL");
    }

    if let Some(fee) = draft.consultation_fee {
        if !fee.is_finite() || fee < 0.0 {
            errors.add("consultation_fee", "Consultation fee cannot be negative");
        }
    }
}

fn location(draft: &RegistrationDraft, errors: &mut ValidationErrors) {
    let address = &draft.address;
    if address.line1.trim().is_empty() {
        errors.add("address.line1", "Street address is required");
    }
    if address.city.trim().is_empty() {
        errors.add("address.city", "City is required");
    }
    let pincode = address.pincode.trim();
    if pincode.len() != PINCODE_LEN || !pincode.chars().all(|c| c.is_ascii_digit()) {
        errors.add("address.pincode", "Pincode must be 6 digits");
    }
    if let (Some(lat), Some(lng)) = (address.latitude, address.longitude) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            errors.add("address.coordinates", "Location coordinates are out of range");
        }
    }
}

fn accessibility(draft: &RegistrationDraft, errors: &mut ValidationErrors) {
    let emergency = &draft.emergency_services;
    if emergency.available {
        match emergency.contact_number.as_deref().map(str::trim) {
            None | Some("") => errors.add(
                "emergency_services.contact_number",
                "Emergency contact number is required",
            ),
            Some(number) if !is_valid_phone(number) => errors.add(
                "emergency_services.contact_number",
                "Enter a valid emergency contact number",
            ),
            _ => {}
        }
    }
}

fn financials(draft: &RegistrationDraft, errors: &mut ValidationErrors) {
    let rate = draft.financials.platform_commission_rate;
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
        errors.add(
            "financials.platform_commission_rate",
            "Commission rate must be between 0 and 100",
        );
    }

    if let Some(gst) = draft.financials.gst_number.as_deref().map(str::trim) {
        if !gst.is_empty()
            && (gst.len() != GSTIN_LEN || !gst.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            errors.add("financials.gst_number", "GST number must be 15 characters");
        }
    }

    let appointments = &draft.appointment_config;
    if appointments.slot_duration == 0 || appointments.slot_duration > MAX_SLOT_MINUTES {
        errors.add(
            "appointment_config.slot_duration",
            "Slot duration must be between 1 and 240 minutes",
        );
    }
    if appointments.advance_booking_limit == 0 {
        errors.add(
            "appointment_config.advance_booking_limit",
            "Advance booking limit must be at least one day",
        );
    }

    let home = &draft.home_visit_config;
    if home.is_available && (!home.radius_km.is_finite() || home.radius_km <= 0.0) {
        errors.add(
            "home_visit_config.radius_km",
            "Service radius is required for home visits",
        );
    }
    let amounts = [home.travel_fee, home.min_booking_amount];
    if amounts.iter().any(|a| !a.is_finite() || *a < 0.0) {
        errors.add("home_visit_config", "Home visit amounts must be zero or more");
    }
}

fn social_links(draft: &RegistrationDraft, errors: &mut ValidationErrors) {
    let links = [
        ("social_links.facebook", &draft.social_links.facebook),
        ("social_links.instagram", &draft.social_links.instagram),
        ("social_links.youtube", &draft.social_links.youtube),
    ];
    for (field, link) in links {
        if let Some(link) = link.as_deref().map(str::trim) {
            if !link.is_empty() && normalize_url(link).is_none() {
                errors.add(field, "Enter a valid URL");
            }
        }
    }
}

fn is_valid_phone(number: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')');
    let digits = number.chars().filter(char::is_ascii_digit).count();
    number.chars().all(allowed) && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Parse a user-typed link, assuming https when the scheme is missing.
pub fn normalize_url(input: &str) -> Option<String> {
    let input = input.trim();
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };
    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?;
    if !matches!(url.scheme(), "http" | "https") || !host.contains('.') {
        return None;
    }
    Some(url.to_string())
}
