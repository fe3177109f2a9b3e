//! Clinic Onboard Core Library
//!
//! Client core for the physiotherapy clinic app: the multi-step clinic
//! registration wizard, concurrent photo uploads, the open/closed evaluator
//! for operating hours, the exercise filter sheet and app-wide state.
//!
//! # Architecture
//!
//! ```text
//!  BasicInfo → Location → Accessibility → Financials → SocialLinks
//!      → Specializations → FacilitiesGallery → Review ──submit──► POST /clinics
//!                               │
//!                       pick photos (≤ 10)
//!                               │
//!               ┌───────────────┼───────────────┐
//!               ▼               ▼               ▼
//!          upload #1       upload #2  ...   upload #n      (tokio tasks)
//!               │               │               │
//!               └──── settle by ImageId ────────┘
//! ```
//!
//! # Modules
//!
//! - [`wizard`]: step controller, validation and request assembly
//! - [`uploads`]: image upload tracker and async driver
//! - [`selection`]: multi-select chips, vocabularies, country picker
//! - [`schedule`]: clinic open/closed evaluation
//! - [`filters`]: exercise filter sheet
//! - [`state`]: session and user notices
//! - [`db`]: SQLite app flags
//! - [`config`], [`logging`]: client configuration and tracing setup

pub mod config;
pub mod db;
pub mod filters;
pub mod logging;
pub mod models;
pub mod schedule;
pub mod selection;
pub mod state;
pub mod uploads;
pub mod wizard;

// Re-export commonly used types
pub use config::ClientConfig;
pub use db::Database;
pub use filters::FilterSheet;
pub use models::{AppliedFilters, ImageId, RegistrationDraft};
pub use state::{AppState, Notice, Session};
pub use uploads::{UploadSink, UploadTracker};
pub use wizard::{StepFormController, SubmitError, WizardStep};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{NaiveDateTime, Weekday};
use clinic_onboard_api::{ApiError, ClinicApi, HttpClinicApi, ImageAsset};
use tokio::sync::broadcast;

use crate::models::{DaySchedule, OperatingHours, Shift};
use crate::selection::{SelectionChange, FACILITIES, SPECIALIZATIONS};
use crate::state::ToastLevel;
use crate::uploads::{MediaPermission, UploadError};
use crate::wizard::{StepState, ValidationErrors};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicOnboardError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Busy: {0}")]
    Busy(String),
}

fn describe_fields(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for ClinicOnboardError {
    fn from(e: ValidationErrors) -> Self {
        ClinicOnboardError::Validation(describe_fields(&e))
    }
}

impl From<db::DbError> for ClinicOnboardError {
    fn from(e: db::DbError) -> Self {
        ClinicOnboardError::Storage(e.to_string())
    }
}

impl From<ApiError> for ClinicOnboardError {
    fn from(e: ApiError) -> Self {
        ClinicOnboardError::Network(e.to_string())
    }
}

impl From<UploadError> for ClinicOnboardError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::PermissionDenied => ClinicOnboardError::PermissionDenied(e.to_string()),
            UploadError::TooManyImages { .. } => ClinicOnboardError::Upload(e.to_string()),
            UploadError::NotFound(_) => ClinicOnboardError::NotFound(e.to_string()),
            UploadError::NotRetryable(_) => ClinicOnboardError::InvalidInput(e.to_string()),
        }
    }
}

impl From<SubmitError> for ClinicOnboardError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::NotOnFinalStep(_) | SubmitError::Abandoned => {
                ClinicOnboardError::InvalidInput(e.to_string())
            }
            SubmitError::UploadsInProgress { .. } | SubmitError::AlreadySubmitting => {
                ClinicOnboardError::Busy(e.to_string())
            }
            SubmitError::Validation(errors) => errors.into(),
            SubmitError::Api(api) => api.into(),
        }
    }
}

impl From<selection::SelectionError> for ClinicOnboardError {
    fn from(e: selection::SelectionError) -> Self {
        ClinicOnboardError::InvalidInput(e.to_string())
    }
}

impl From<filters::FilterError> for ClinicOnboardError {
    fn from(e: filters::FilterError) -> Self {
        ClinicOnboardError::InvalidInput(e.to_string())
    }
}

impl From<config::ConfigError> for ClinicOnboardError {
    fn from(e: config::ConfigError) -> Self {
        ClinicOnboardError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for ClinicOnboardError {
    fn from(e: serde_json::Error) -> Self {
        ClinicOnboardError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicOnboardError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicOnboardError::Storage(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the tracing subscriber. Returns `false` if one was already set.
#[uniffi::export]
pub fn enable_logging(level: String) -> bool {
    logging::init_logging(&level)
}

/// Build the core from a JSON [`ClientConfig`].
#[uniffi::export]
pub fn open_core(config_json: String) -> Result<Arc<ClinicOnboardCore>, ClinicOnboardError> {
    let config = ClientConfig::from_json(&config_json)?;
    config.validate()?;
    logging::init_logging(&config.log_level);

    let api = HttpClinicApi::new(config.api_config())?;
    let db = match config.storage_path.as_deref() {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    ClinicOnboardCore::with_api(&config, Arc::new(api), db)
}

/// Core with in-memory storage (for previews and testing).
#[uniffi::export]
pub fn open_core_in_memory(base_url: String) -> Result<Arc<ClinicOnboardCore>, ClinicOnboardError> {
    let config = ClientConfig {
        api_base_url: base_url,
        ..ClientConfig::default()
    };
    config.validate()?;
    let api = HttpClinicApi::new(config.api_config())?;
    ClinicOnboardCore::with_api(&config, Arc::new(api), Database::open_in_memory()?)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Forwards upload results into the wizard and raises a toast on failure.
struct WizardSink {
    wizard: Arc<Mutex<StepFormController>>,
    state: Arc<AppState>,
}

impl UploadSink for WizardSink {
    fn settle(&self, id: &ImageId, result: Result<String, String>) -> bool {
        let failure = result.as_ref().err().cloned();
        let applied = self.wizard.settle(id, result);
        if let (true, Some(message)) = (applied, failure) {
            self.state
                .toast_error(format!("Photo upload failed: {}", message));
        }
        applied
    }
}

/// Thread-safe client core for FFI.
///
/// Owns its own tokio runtime; exported methods block on it and never hold
/// the wizard lock across a network call.
#[derive(uniffi::Object)]
pub struct ClinicOnboardCore {
    runtime: tokio::runtime::Runtime,
    api: Arc<dyn ClinicApi>,
    db: Mutex<Database>,
    wizard: Arc<Mutex<StepFormController>>,
    state: Arc<AppState>,
    notices: Mutex<broadcast::Receiver<Notice>>,
    filter_sheet: Mutex<Option<FilterSheet>>,
    applied_filters: Mutex<AppliedFilters>,
}

impl ClinicOnboardCore {
    /// Assemble a core around any [`ClinicApi`] implementation.
    pub fn with_api(
        config: &ClientConfig,
        api: Arc<dyn ClinicApi>,
        db: Database,
    ) -> Result<Arc<Self>, ClinicOnboardError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("clinic-onboard")
            .enable_all()
            .build()
            .map_err(|e| ClinicOnboardError::Config(format!("Could not start runtime: {}", e)))?;

        let state = Arc::new(AppState::new());
        let notices = Mutex::new(state.subscribe_notices());
        if db.startup_flags()?.logged_in {
            state.update_session(|s| s.logged_in = true);
        }

        Ok(Arc::new(Self {
            runtime,
            api,
            db: Mutex::new(db),
            wizard: Arc::new(Mutex::new(StepFormController::with_max_images(
                config.max_images,
            ))),
            state,
            notices,
            filter_sheet: Mutex::new(None),
            applied_filters: Mutex::new(AppliedFilters::new()),
        }))
    }

    pub fn app_state(&self) -> &AppState {
        &self.state
    }

    fn report_api_error(&self, context: &str, error: &ApiError) {
        tracing::error!(error = %error, "{}", context);
        self.state.toast_error(format!("{}: {}", context, error));
    }

    fn toggle_chip(
        &self,
        option: &str,
        pick: impl FnOnce(&mut RegistrationDraft) -> &mut selection::MultiSelect,
        vocabulary: &[&str],
    ) -> Result<Vec<String>, ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        let chips = pick(wizard.edit()?);
        if chips.toggle_known(option, vocabulary)? == SelectionChange::Ignored {
            self.state
                .toast(ToastLevel::Info, "Selection limit reached; remove one first");
        }
        Ok(chips.to_vec())
    }
}

#[uniffi::export]
impl ClinicOnboardCore {
    // =========================================================================
    // Session & Flags
    // =========================================================================

    /// Flags that decide the first screen. Defaults are stored on first read.
    pub fn startup_flags(&self) -> Result<FfiStartupFlags, ClinicOnboardError> {
        let db = self.db.lock()?;
        Ok(db.startup_flags()?.into())
    }

    pub fn mark_launched(&self) -> Result<(), ClinicOnboardError> {
        let db = self.db.lock()?;
        db.mark_launched()?;
        Ok(())
    }

    pub fn sign_in(&self, user_name: String) -> Result<(), ClinicOnboardError> {
        self.db.lock()?.set_logged_in(true)?;
        self.state.sign_in(user_name);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), ClinicOnboardError> {
        self.db.lock()?.set_logged_in(false)?;
        self.state.sign_out();
        Ok(())
    }

    pub fn session(&self) -> FfiSession {
        self.state.session().into()
    }

    /// Drain toasts and alerts published since the last call.
    pub fn poll_notices(&self) -> Result<Vec<FfiNotice>, ClinicOnboardError> {
        let mut rx = self.notices.lock()?;
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(notice) => out.push(notice.into()),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notice receiver lagged");
                }
                Err(_) => break,
            }
        }
        Ok(out)
    }

    // =========================================================================
    // Clinic Home
    // =========================================================================

    pub fn clinic_summary(&self) -> Result<FfiClinicSummary, ClinicOnboardError> {
        let result = self.runtime.block_on(self.api.get_clinic_summary());
        match result {
            Ok(summary) => Ok(summary.into()),
            Err(e) => {
                self.report_api_error("Could not load clinic", &e);
                Err(e.into())
            }
        }
    }

    pub fn is_clinic_open(&self, hours: FfiOperatingHours) -> Result<bool, ClinicOnboardError> {
        Ok(schedule::is_open_now(&OperatingHours::try_from(hours)?))
    }

    /// `at` is a local time such as `2024-01-01T10:00:00`.
    pub fn is_clinic_open_at(
        &self,
        hours: FfiOperatingHours,
        at: String,
    ) -> Result<bool, ClinicOnboardError> {
        Ok(schedule::is_open(&OperatingHours::try_from(hours)?, parse_local(&at)?))
    }

    pub fn next_opening(
        &self,
        hours: FfiOperatingHours,
        after: String,
    ) -> Result<Option<String>, ClinicOnboardError> {
        let next = schedule::next_opening(&OperatingHours::try_from(hours)?, parse_local(&after)?);
        Ok(next.map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()))
    }

    // =========================================================================
    // Wizard Navigation
    // =========================================================================

    pub fn current_step(&self) -> Result<String, ClinicOnboardError> {
        Ok(self.wizard.lock()?.current_step().key().to_string())
    }

    pub fn step_states(&self) -> Result<Vec<FfiStepState>, ClinicOnboardError> {
        let wizard = self.wizard.lock()?;
        Ok(wizard
            .step_states()
            .into_iter()
            .map(|(step, state)| FfiStepState {
                key: step.key().to_string(),
                label: step.label().to_string(),
                status: state.into(),
            })
            .collect())
    }

    /// Validate the current step and advance when it passes.
    pub fn next(&self) -> Result<FfiStepOutcome, ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        let from = wizard.current_step();
        let outcome = match wizard.next() {
            Ok(step) => {
                tracing::info!(from = from.key(), to = step.key(), "wizard advanced");
                FfiStepOutcome {
                    step: step.key().to_string(),
                    errors: Vec::new(),
                }
            }
            Err(errors) => FfiStepOutcome {
                step: from.key().to_string(),
                errors: field_errors(&errors),
            },
        };
        Ok(outcome)
    }

    pub fn back(&self) -> Result<String, ClinicOnboardError> {
        Ok(self.wizard.lock()?.back().key().to_string())
    }

    pub fn go_to_step(&self, key: String) -> Result<bool, ClinicOnboardError> {
        let step = WizardStep::from_key(&key)
            .ok_or_else(|| ClinicOnboardError::InvalidInput(format!("Unknown step: {}", key)))?;
        Ok(self.wizard.lock()?.go_to(step))
    }

    pub fn validate_current_step(&self) -> Result<Vec<FfiFieldError>, ClinicOnboardError> {
        Ok(field_errors(&self.wizard.lock()?.validate_current()))
    }

    // =========================================================================
    // Wizard Fields
    // =========================================================================

    pub fn set_basic_info(&self, info: FfiBasicInfo) -> Result<(), ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        let draft = wizard.edit()?;
        draft.name = info.name;
        draft.description = info.description;
        draft.phone = models::PhoneNumber::new(info.dial_code, info.phone);
        draft.email = info.email;
        draft.website = info.website;
        draft.consultation_fee = info.consultation_fee;
        Ok(())
    }

    pub fn set_location(&self, address: FfiAddress) -> Result<(), ClinicOnboardError> {
        self.wizard.lock()?.edit()?.address = address.into();
        Ok(())
    }

    pub fn set_accessibility(&self, info: FfiAccessibility) -> Result<(), ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        let draft = wizard.edit()?;
        draft.accessibility = models::Accessibility {
            parking_info: info.parking_info,
            wheelchair_accessible: info.wheelchair_accessible,
            elevator: info.elevator,
            accessible_bathroom: info.accessible_bathroom,
        };
        draft.emergency_services = models::EmergencyServices {
            available: info.emergency_available,
            contact_number: info.emergency_contact,
        };
        Ok(())
    }

    pub fn set_financials(&self, info: FfiFinancials) -> Result<(), ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        let draft = wizard.edit()?;
        draft.financials = models::Financials {
            platform_commission_rate: info.platform_commission_rate,
            gst_number: info.gst_number,
        };
        draft.appointment_config = models::AppointmentConfig {
            slot_duration: info.slot_duration,
            buffer_time: info.buffer_time,
            advance_booking_limit: info.advance_booking_limit,
            instant_booking: info.instant_booking,
            virtual_consultation: info.virtual_consultation,
        };
        draft.home_visit_config = models::HomeVisitConfig {
            is_available: info.home_visits_available,
            radius_km: info.home_visit_radius_km,
            travel_fee: info.travel_fee,
            min_booking_amount: info.min_booking_amount,
        };
        Ok(())
    }

    pub fn set_social_links(&self, links: FfiSocialLinks) -> Result<(), ClinicOnboardError> {
        self.wizard.lock()?.edit()?.social_links = models::SocialLinks {
            facebook: links.facebook,
            instagram: links.instagram,
            youtube: links.youtube,
        };
        Ok(())
    }

    pub fn set_operating_hours(&self, hours: FfiOperatingHours) -> Result<(), ClinicOnboardError> {
        let hours = OperatingHours::try_from(hours)?;
        self.wizard.lock()?.edit()?.operating_hours = hours;
        Ok(())
    }

    pub fn facility_options(&self) -> Vec<String> {
        FACILITIES.iter().map(|s| s.to_string()).collect()
    }

    pub fn specialization_options(&self) -> Vec<String> {
        SPECIALIZATIONS.iter().map(|s| s.to_string()).collect()
    }

    /// Toggle a facility chip. Returns the selection afterwards.
    pub fn toggle_facility(&self, option: String) -> Result<Vec<String>, ClinicOnboardError> {
        self.toggle_chip(&option, |d| &mut d.facilities, FACILITIES)
    }

    /// Toggle a specialization chip. Returns the selection afterwards.
    pub fn toggle_specialization(&self, option: String) -> Result<Vec<String>, ClinicOnboardError> {
        self.toggle_chip(&option, |d| &mut d.specializations, SPECIALIZATIONS)
    }

    pub fn add_insurance_provider(&self, name: String) -> Result<u32, ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        let index = wizard
            .edit()?
            .insurance
            .add_provider(&name)
            .ok_or_else(|| ClinicOnboardError::InvalidInput("Provider name is empty".into()))?;
        Ok(index as u32)
    }

    pub fn remove_insurance_provider(&self, index: u32) -> Result<(), ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        wizard
            .edit()?
            .insurance
            .remove_provider(index as usize)
            .map(|_| ())
            .ok_or_else(|| ClinicOnboardError::NotFound(format!("Insurance provider {}", index)))
    }

    pub fn add_policy_type(
        &self,
        provider_index: u32,
        policy: String,
    ) -> Result<(), ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        if wizard
            .edit()?
            .insurance
            .add_policy_type(provider_index as usize, &policy)
        {
            Ok(())
        } else {
            Err(ClinicOnboardError::InvalidInput(format!(
                "Cannot add policy type to provider {}",
                provider_index
            )))
        }
    }

    pub fn remove_policy_type(
        &self,
        provider_index: u32,
        policy_index: u32,
    ) -> Result<(), ClinicOnboardError> {
        let mut wizard = self.wizard.lock()?;
        wizard
            .edit()?
            .insurance
            .remove_policy_type(provider_index as usize, policy_index as usize)
            .map(|_| ())
            .ok_or_else(|| {
                ClinicOnboardError::NotFound(format!(
                    "Policy type {} of provider {}",
                    policy_index, provider_index
                ))
            })
    }

    pub fn insurance_providers(&self) -> Result<Vec<FfiInsuranceProvider>, ClinicOnboardError> {
        let wizard = self.wizard.lock()?;
        Ok(wizard
            .draft()
            .insurance
            .providers()
            .iter()
            .map(|p| FfiInsuranceProvider {
                provider: p.provider.clone(),
                policy_types: p.policy_types.clone(),
            })
            .collect())
    }

    // =========================================================================
    // Photos
    // =========================================================================

    /// Add picked photos and start uploading each one. Returns the new ids.
    pub fn select_images(
        &self,
        permission_granted: bool,
        picked: Vec<FfiImageAsset>,
    ) -> Result<Vec<String>, ClinicOnboardError> {
        let permission = if permission_granted {
            MediaPermission::Granted
        } else {
            MediaPermission::Denied
        };
        let assets = picked.into_iter().map(ImageAsset::from).collect();

        let selected = self
            .wizard
            .lock()?
            .edit()?
            .images
            .select_images(permission, assets);
        let jobs = match selected {
            Ok(jobs) => jobs,
            Err(UploadError::PermissionDenied) => {
                self.state.alert(
                    "Photo access needed",
                    "Allow access to your photo library to add clinic photos.",
                );
                return Err(UploadError::PermissionDenied.into());
            }
            Err(e) => {
                self.state.toast_error(e.to_string());
                return Err(e.into());
            }
        };

        let ids = jobs.iter().map(|j| j.id.to_string()).collect();
        uploads::spawn_uploads(self.runtime.handle(), Arc::clone(&self.api), self.sink(), jobs);
        Ok(ids)
    }

    pub fn retry_upload(&self, image_id: String) -> Result<(), ClinicOnboardError> {
        let job = self
            .wizard
            .lock()?
            .edit()?
            .images
            .retry_upload(&ImageId::from(image_id))?;
        uploads::spawn_upload(self.runtime.handle(), Arc::clone(&self.api), self.sink(), job);
        Ok(())
    }

    pub fn remove_image(&self, image_id: String) -> Result<(), ClinicOnboardError> {
        let id = ImageId::from(image_id);
        self.wizard
            .lock()?
            .edit()?
            .images
            .remove_image(&id)
            .map(|_| ())
            .ok_or_else(|| UploadError::NotFound(id).into())
    }

    pub fn make_cover(&self, image_id: String) -> Result<(), ClinicOnboardError> {
        self.wizard
            .lock()?
            .edit()?
            .images
            .make_cover(&ImageId::from(image_id))?;
        Ok(())
    }

    /// Photos in display order; the first is the cover.
    pub fn images(&self) -> Result<Vec<FfiImage>, ClinicOnboardError> {
        let wizard = self.wizard.lock()?;
        Ok(wizard
            .draft()
            .images
            .images()
            .iter()
            .map(FfiImage::from)
            .collect())
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// The request body the review step shows, as JSON.
    pub fn review_payload_json(&self) -> Result<String, ClinicOnboardError> {
        let wizard = self.wizard.lock()?;
        Ok(serde_json::to_string_pretty(&wizard::assemble(wizard.draft()))?)
    }

    pub fn can_submit(&self) -> Result<bool, ClinicOnboardError> {
        Ok(self.wizard.lock()?.can_submit())
    }

    /// Register the clinic. The draft resets only when the server accepts it.
    pub fn submit(&self) -> Result<FfiCreatedClinic, ClinicOnboardError> {
        let (ticket, request) = self.wizard.lock()?.prepare_submission()?;

        let result = self.runtime.block_on(self.api.create_clinic(&request));
        let finished = self.wizard.lock()?.finish_submission(ticket, result);
        let response = match finished {
            Ok(response) => response,
            Err(SubmitError::Api(e)) => {
                self.report_api_error("Could not register clinic", &e);
                return Err(SubmitError::Api(e).into());
            }
            Err(e) => return Err(e.into()),
        };
        self.state
            .update_session(|s| s.clinic_id = Some(response.id.clone()));
        self.state
            .toast(ToastLevel::Success, "Clinic submitted for verification");
        Ok(FfiCreatedClinic {
            id: response.id,
            status: response.status,
        })
    }

    /// Discard the draft and return to the first step.
    pub fn cancel(&self) -> Result<(), ClinicOnboardError> {
        self.wizard.lock()?.cancel();
        Ok(())
    }

    // =========================================================================
    // Country Picker
    // =========================================================================

    pub fn default_country(&self) -> FfiCountry {
        (&selection::DEFAULT_COUNTRY).into()
    }

    pub fn search_countries(&self, query: String, limit: u32) -> Vec<FfiCountry> {
        selection::search_countries(&query, limit as usize)
            .into_iter()
            .map(FfiCountry::from)
            .collect()
    }

    // =========================================================================
    // Exercise Filters
    // =========================================================================

    /// Fetch categories and open the sheet seeded with the applied filters.
    pub fn open_filter_sheet(&self) -> Result<Vec<FfiFilterCategory>, ClinicOnboardError> {
        let initial = self.applied_filters.lock()?.clone();
        let sheet = match self
            .runtime
            .block_on(FilterSheet::open(self.api.as_ref(), initial))
        {
            Ok(sheet) => sheet,
            Err(e) => {
                self.report_api_error("Could not load filters", &e);
                return Err(e.into());
            }
        };

        let categories = sheet
            .categories()
            .iter()
            .map(|c| FfiFilterCategory {
                name: c.name.clone(),
                label: c.label.clone().unwrap_or_else(|| c.name.clone()),
                options: c
                    .options
                    .iter()
                    .map(|o| FfiFilterOption {
                        id: o.id.clone(),
                        label: o.label.clone(),
                        selected: sheet.is_selected(&c.name, &o.id),
                    })
                    .collect(),
            })
            .collect();
        *self.filter_sheet.lock()? = Some(sheet);
        Ok(categories)
    }

    pub fn toggle_filter(&self, category: String, option_id: String) -> Result<bool, ClinicOnboardError> {
        let mut sheet = self.filter_sheet.lock()?;
        let sheet = sheet
            .as_mut()
            .ok_or_else(|| ClinicOnboardError::InvalidInput("Filter sheet is not open".into()))?;
        Ok(sheet.toggle(&category, &option_id)?)
    }

    pub fn clear_filters(&self) -> Result<(), ClinicOnboardError> {
        if let Some(sheet) = self.filter_sheet.lock()?.as_mut() {
            sheet.clear();
        }
        Ok(())
    }

    /// Close the sheet and apply its selection.
    pub fn confirm_filters(&self) -> Result<Vec<FfiAppliedFilter>, ClinicOnboardError> {
        let sheet = self
            .filter_sheet
            .lock()?
            .take()
            .ok_or_else(|| ClinicOnboardError::InvalidInput("Filter sheet is not open".into()))?;
        let applied = sheet.confirm();
        let out = applied_to_ffi(&applied);
        *self.applied_filters.lock()? = applied;
        Ok(out)
    }

    pub fn cancel_filters(&self) -> Result<(), ClinicOnboardError> {
        if let Some(sheet) = self.filter_sheet.lock()?.take() {
            sheet.cancel();
        }
        Ok(())
    }

    pub fn applied_filters(&self) -> Result<Vec<FfiAppliedFilter>, ClinicOnboardError> {
        let applied = self.applied_filters.lock()?;
        Ok(applied_to_ffi(&applied))
    }
}

impl ClinicOnboardCore {
    fn sink(&self) -> Arc<dyn UploadSink> {
        Arc::new(WizardSink {
            wizard: Arc::clone(&self.wizard),
            state: Arc::clone(&self.state),
        })
    }
}

fn parse_local(value: &str) -> Result<NaiveDateTime, ClinicOnboardError> {
    value
        .parse::<NaiveDateTime>()
        .map_err(|e| ClinicOnboardError::InvalidInput(format!("Bad local time {}: {}", value, e)))
}

fn field_errors(errors: &ValidationErrors) -> Vec<FfiFieldError> {
    errors
        .iter()
        .map(|(field, message)| FfiFieldError {
            field: field.clone(),
            message: message.clone(),
        })
        .collect()
}

fn applied_to_ffi(applied: &AppliedFilters) -> Vec<FfiAppliedFilter> {
    applied
        .iter()
        .map(|(category, ids)| FfiAppliedFilter {
            category: category.clone(),
            option_ids: ids.clone(),
        })
        .collect()
}

// =========================================================================
// FFI Types
// =========================================================================

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStartupFlags {
    pub first_launch: bool,
    pub logged_in: bool,
}

impl From<db::StartupFlags> for FfiStartupFlags {
    fn from(flags: db::StartupFlags) -> Self {
        Self {
            first_launch: flags.first_launch,
            logged_in: flags.logged_in,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub logged_in: bool,
    pub user_name: Option<String>,
    pub clinic_id: Option<String>,
}

impl From<Session> for FfiSession {
    fn from(session: Session) -> Self {
        Self {
            logged_in: session.logged_in,
            user_name: session.user_name,
            clinic_id: session.clinic_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiNotice {
    Toast { level: String, message: String },
    Alert { title: String, message: String },
}

impl From<Notice> for FfiNotice {
    fn from(notice: Notice) -> Self {
        match notice {
            Notice::Toast { level, message } => FfiNotice::Toast {
                level: format!("{:?}", level).to_lowercase(),
                message,
            },
            Notice::Alert { title, message } => FfiNotice::Alert { title, message },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiStepStatus {
    Completed,
    Current,
    Upcoming,
}

impl From<StepState> for FfiStepStatus {
    fn from(state: StepState) -> Self {
        match state {
            StepState::Completed => FfiStepStatus::Completed,
            StepState::Current => FfiStepStatus::Current,
            StepState::Upcoming => FfiStepStatus::Upcoming,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStepState {
    pub key: String,
    pub label: String,
    pub status: FfiStepStatus,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiFieldError {
    pub field: String,
    pub message: String,
}

/// Result of a `next()` call; `errors` is empty when the step advanced.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStepOutcome {
    pub step: String,
    pub errors: Vec<FfiFieldError>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBasicInfo {
    pub name: String,
    pub description: String,
    pub dial_code: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub consultation_fee: Option<f64>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<FfiAddress> for models::Address {
    fn from(a: FfiAddress) -> Self {
        models::Address {
            line1: a.line1,
            line2: a.line2,
            city: a.city,
            state: a.state,
            pincode: a.pincode,
            latitude: a.latitude,
            longitude: a.longitude,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAccessibility {
    pub parking_info: Option<String>,
    pub wheelchair_accessible: bool,
    pub elevator: bool,
    pub accessible_bathroom: bool,
    pub emergency_available: bool,
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFinancials {
    pub platform_commission_rate: f64,
    pub gst_number: Option<String>,
    pub slot_duration: u32,
    pub buffer_time: u32,
    pub advance_booking_limit: u32,
    pub instant_booking: bool,
    pub virtual_consultation: bool,
    pub home_visits_available: bool,
    pub home_visit_radius_km: f64,
    pub travel_fee: f64,
    pub min_booking_amount: f64,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSocialLinks {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiShift {
    pub open: String,
    pub close: String,
}

/// One weekday's hours. `weekday` is a lowercase English day name.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDaySchedule {
    pub weekday: String,
    pub is_closed: bool,
    pub shifts: Vec<FfiShift>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOperatingHours {
    pub open_24hrs: bool,
    pub days: Vec<FfiDaySchedule>,
}

impl TryFrom<FfiOperatingHours> for OperatingHours {
    type Error = ClinicOnboardError;

    fn try_from(hours: FfiOperatingHours) -> Result<Self, Self::Error> {
        let mut out = OperatingHours {
            open_24hrs: hours.open_24hrs,
            ..OperatingHours::default()
        };
        for day in hours.days {
            let weekday = day.weekday.parse::<Weekday>().map_err(|_| {
                ClinicOnboardError::InvalidInput(format!("Unknown weekday: {}", day.weekday))
            })?;
            let entry = DaySchedule {
                is_closed: day.is_closed,
                shifts: day
                    .shifts
                    .into_iter()
                    .map(|s| Shift::new(s.open, s.close))
                    .collect(),
            };
            let slot = match weekday {
                Weekday::Mon => &mut out.schedule.monday,
                Weekday::Tue => &mut out.schedule.tuesday,
                Weekday::Wed => &mut out.schedule.wednesday,
                Weekday::Thu => &mut out.schedule.thursday,
                Weekday::Fri => &mut out.schedule.friday,
                Weekday::Sat => &mut out.schedule.saturday,
                Weekday::Sun => &mut out.schedule.sunday,
            };
            *slot = Some(entry);
        }
        Ok(out)
    }
}

impl From<&OperatingHours> for FfiOperatingHours {
    fn from(hours: &OperatingHours) -> Self {
        const NAMES: [(Weekday, &str); 7] = [
            (Weekday::Mon, "monday"),
            (Weekday::Tue, "tuesday"),
            (Weekday::Wed, "wednesday"),
            (Weekday::Thu, "thursday"),
            (Weekday::Fri, "friday"),
            (Weekday::Sat, "saturday"),
            (Weekday::Sun, "sunday"),
        ];
        let days = NAMES
            .iter()
            .filter_map(|(weekday, name)| {
                schedule::day_schedule(&hours.schedule, *weekday).map(|d| FfiDaySchedule {
                    weekday: name.to_string(),
                    is_closed: d.is_closed,
                    shifts: d
                        .shifts
                        .iter()
                        .map(|s| FfiShift {
                            open: s.open.clone(),
                            close: s.close.clone(),
                        })
                        .collect(),
                })
            })
            .collect();
        Self {
            open_24hrs: hours.open_24hrs,
            days,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicSummary {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub total_patients: Option<u32>,
    pub today_appointments: Option<u32>,
    pub operating_hours: Option<FfiOperatingHours>,
    pub open_now: bool,
}

impl From<clinic_onboard_api::ClinicSummary> for FfiClinicSummary {
    fn from(summary: clinic_onboard_api::ClinicSummary) -> Self {
        let open_now = summary
            .operating_hours
            .as_ref()
            .is_some_and(schedule::is_open_now);
        Self {
            id: summary.id,
            name: summary.name,
            address: summary.address,
            rating: summary.rating,
            total_patients: summary.total_patients,
            today_appointments: summary.today_appointments,
            operating_hours: summary.operating_hours.as_ref().map(FfiOperatingHours::from),
            open_now,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInsuranceProvider {
    pub provider: String,
    pub policy_types: Vec<String>,
}

/// A photo picked from the device library.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImageAsset {
    pub uri: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl From<FfiImageAsset> for ImageAsset {
    fn from(asset: FfiImageAsset) -> Self {
        ImageAsset {
            uri: asset.uri,
            file_name: asset.file_name,
            mime_type: asset.mime_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiUploadStatus {
    Pending,
    Uploading,
    Succeeded,
    Failed,
}

impl From<models::UploadStatus> for FfiUploadStatus {
    fn from(status: models::UploadStatus) -> Self {
        match status {
            models::UploadStatus::Pending => FfiUploadStatus::Pending,
            models::UploadStatus::Uploading => FfiUploadStatus::Uploading,
            models::UploadStatus::Succeeded => FfiUploadStatus::Succeeded,
            models::UploadStatus::Failed => FfiUploadStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImage {
    pub id: String,
    pub uri: String,
    pub uploaded_url: Option<String>,
    pub status: FfiUploadStatus,
    pub error: Option<String>,
}

impl From<&models::ImageUploadState> for FfiImage {
    fn from(image: &models::ImageUploadState) -> Self {
        Self {
            id: image.id.to_string(),
            uri: image.asset.uri.clone(),
            uploaded_url: image.uploaded_url.clone(),
            status: image.status().into(),
            error: image.error.clone(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCreatedClinic {
    pub id: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCountry {
    pub iso: String,
    pub name: String,
    pub dial_code: String,
}

impl From<&selection::Country> for FfiCountry {
    fn from(country: &selection::Country) -> Self {
        Self {
            iso: country.iso.to_string(),
            name: country.name.to_string(),
            dial_code: country.dial_code.to_string(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFilterOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFilterCategory {
    pub name: String,
    pub label: String,
    pub options: Vec<FfiFilterOption>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiAppliedFilter {
    pub category: String,
    pub option_ids: Vec<String>,
}
