//! Drives the registration wizard: step navigation, gating and submission.

use std::sync::Mutex;

use clinic_onboard_api::{ApiError, ApiResult, ClinicApi, CreateClinicRequest, CreateClinicResponse};
use thiserror::Error;

use super::assemble::assemble;
use super::steps::{indicator, StepState, WizardStep};
use super::validation::{validate_draft, validate_step, ValidationErrors};
use crate::models::{ImageId, RegistrationDraft};
use crate::uploads::UploadSink;

/// Submission errors.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submission is only available on the review step (currently {0:?})")]
    NotOnFinalStep(WizardStep),

    #[error("{count} photo(s) still uploading")]
    UploadsInProgress { count: usize },

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Registration was cancelled before the server replied")]
    Abandoned,

    #[error("Registration is incomplete: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Could not create clinic: {0}")]
    Api(#[from] ApiError),
}

/// Names one submission attempt. A result carrying an older ticket belongs
/// to a draft that was cancelled or already reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

/// Owns the draft and the current step.
#[derive(Debug, Default)]
pub struct StepFormController {
    draft: RegistrationDraft,
    step: WizardStep,
    submitting: bool,
    generation: u64,
}

impl StepFormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_images(max_images: usize) -> Self {
        Self {
            draft: RegistrationDraft::with_max_images(max_images),
            ..Self::default()
        }
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Unguarded access; callers outside a submission use [`Self::edit`].
    pub fn draft_mut(&mut self) -> &mut RegistrationDraft {
        &mut self.draft
    }

    /// The draft for user edits. Refused while a submission is in flight.
    pub fn edit(&mut self) -> Result<&mut RegistrationDraft, SubmitError> {
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        Ok(&mut self.draft)
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn validate_current(&self) -> ValidationErrors {
        validate_step(self.step, &self.draft)
    }

    /// Validate the current step and advance when it passes.
    ///
    /// On the last step a passing call stays put.
    pub fn next(&mut self) -> Result<WizardStep, ValidationErrors> {
        let errors = self.validate_current();
        if !errors.is_empty() {
            tracing::debug!(step = self.step.key(), invalid = errors.len(), "step blocked");
            return Err(errors);
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step without validating.
    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Jump to an earlier step from the indicator. Forward jumps are refused.
    pub fn go_to(&mut self, step: WizardStep) -> bool {
        if step <= self.step {
            self.step = step;
            true
        } else {
            false
        }
    }

    pub fn step_states(&self) -> Vec<(WizardStep, StepState)> {
        indicator(self.step)
    }

    pub fn can_submit(&self) -> bool {
        self.step.is_last()
            && !self.submitting
            && !self.draft.images.any_uploading()
            && validate_draft(&self.draft).is_empty()
    }

    /// Check every gate and build the request body.
    ///
    /// Marks the controller as submitting; pass the ticket back to
    /// [`StepFormController::finish_submission`].
    pub fn prepare_submission(
        &mut self,
    ) -> Result<(SubmissionTicket, CreateClinicRequest), SubmitError> {
        if !self.step.is_last() {
            return Err(SubmitError::NotOnFinalStep(self.step));
        }
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        let count = self.draft.images.uploading_count();
        if count > 0 {
            tracing::info!(count, "submission blocked by pending uploads");
            return Err(SubmitError::UploadsInProgress { count });
        }
        validate_draft(&self.draft).into_result()?;

        self.submitting = true;
        self.generation = self.generation.wrapping_add(1);
        Ok((SubmissionTicket(self.generation), assemble(&self.draft)))
    }

    /// Apply the create-clinic result. The draft resets only on success.
    ///
    /// A result for an abandoned attempt leaves the current draft alone.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: ApiResult<CreateClinicResponse>,
    ) -> Result<CreateClinicResponse, SubmitError> {
        if !self.submitting || ticket != SubmissionTicket(self.generation) {
            tracing::info!(ok = result.is_ok(), "dropping result of abandoned submission");
            return Err(SubmitError::Abandoned);
        }
        self.submitting = false;
        match result {
            Ok(response) => {
                tracing::info!(clinic = %response.id, "clinic registered");
                self.reset();
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(error = %e, "clinic registration failed; draft kept");
                Err(SubmitError::Api(e))
            }
        }
    }

    /// Validate, create the clinic and reset on success.
    pub async fn submit(&mut self, api: &dyn ClinicApi) -> Result<CreateClinicResponse, SubmitError> {
        let (ticket, request) = self.prepare_submission()?;
        let result = api.create_clinic(&request).await;
        self.finish_submission(ticket, result)
    }

    /// Discard the draft and return to the first step.
    pub fn cancel(&mut self) {
        tracing::debug!(step = self.step.key(), "wizard cancelled");
        self.reset();
    }

    fn reset(&mut self) {
        let max_images = self.draft.images.max_images();
        self.draft = RegistrationDraft::with_max_images(max_images);
        self.step = WizardStep::FIRST;
        self.submitting = false;
        self.generation = self.generation.wrapping_add(1);
    }
}

impl UploadSink for Mutex<StepFormController> {
    fn settle(&self, id: &ImageId, result: Result<String, String>) -> bool {
        let mut wizard = self.lock().unwrap_or_else(|e| e.into_inner());
        wizard.draft.images.on_upload_settled(id, result)
    }
}
