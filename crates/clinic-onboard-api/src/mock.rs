//! In-memory [`ClinicApi`] for tests and UI previews.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::client::{ApiError, ApiResult, ClinicApi};
use crate::types::{
    content_key, ClinicSummary, CreateClinicRequest, CreateClinicResponse, FilterCategory,
    ImageAsset, UploadedImage,
};

#[derive(Default)]
struct MockState {
    /// uri -> number of upcoming failures
    failing_uploads: HashMap<String, usize>,
    upload_calls: Vec<String>,
    create_calls: Vec<CreateClinicRequest>,
    failing_creates: usize,
    summary: Option<ClinicSummary>,
    filters: Vec<FilterCategory>,
}

/// Scriptable fake backend.
///
/// Uploads succeed with a content-addressed CDN URL unless failures were
/// scheduled for that URI. Uploads can be held open with
/// [`MockClinicApi::hold_uploads`] to simulate in-flight requests.
pub struct MockClinicApi {
    state: Mutex<MockState>,
    gate: watch::Sender<bool>,
}

impl Default for MockClinicApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClinicApi {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            state: Mutex::new(MockState::default()),
            gate,
        }
    }

    /// URL the mock hands back for an uploaded asset.
    pub fn url_for(asset_uri: &str) -> String {
        format!("https://cdn.example.test/{}.jpg", content_key(asset_uri.as_bytes()))
    }

    pub fn with_summary(self, summary: ClinicSummary) -> Self {
        self.lock().summary = Some(summary);
        self
    }

    pub fn with_filters(self, filters: Vec<FilterCategory>) -> Self {
        self.lock().filters = filters;
        self
    }

    /// Fail the next `times` uploads of `uri`.
    pub fn fail_uploads(&self, uri: &str, times: usize) {
        self.lock().failing_uploads.insert(uri.to_string(), times);
    }

    /// Fail the next `times` create calls.
    pub fn fail_creates(&self, times: usize) {
        self.lock().failing_creates = times;
    }

    /// Block uploads until [`MockClinicApi::release_uploads`].
    pub fn hold_uploads(&self) {
        self.gate.send_replace(false);
    }

    pub fn release_uploads(&self) {
        self.gate.send_replace(true);
    }

    /// URIs passed to `upload_image`, in call order.
    pub fn upload_calls(&self) -> Vec<String> {
        self.lock().upload_calls.clone()
    }

    pub fn create_calls(&self) -> Vec<CreateClinicRequest> {
        self.lock().create_calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded calls
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ClinicApi for MockClinicApi {
    async fn get_clinic_summary(&self) -> ApiResult<ClinicSummary> {
        self.lock()
            .summary
            .clone()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "clinic not found".into(),
            })
    }

    async fn upload_image(&self, asset: &ImageAsset) -> ApiResult<UploadedImage> {
        self.lock().upload_calls.push(asset.uri.clone());

        let mut gate = self.gate.subscribe();
        gate.wait_for(|open| *open)
            .await
            .map_err(|e| ApiError::Other(e.to_string()))?;

        let mut state = self.lock();
        if let Some(remaining) = state.failing_uploads.get_mut(&asset.uri) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ApiError::Other(format!("upload of {} failed", asset.uri)));
            }
        }

        Ok(UploadedImage {
            url: Self::url_for(&asset.uri),
            content_key: Some(content_key(asset.uri.as_bytes())),
        })
    }

    async fn create_clinic(&self, request: &CreateClinicRequest) -> ApiResult<CreateClinicResponse> {
        let mut state = self.lock();
        state.create_calls.push(request.clone());
        if state.failing_creates > 0 {
            state.failing_creates -= 1;
            return Err(ApiError::Status {
                status: 503,
                message: "service unavailable".into(),
            });
        }
        Ok(CreateClinicResponse {
            id: format!("clinic-{}", state.create_calls.len()),
            status: Some("pending_verification".into()),
        })
    }

    async fn get_exercise_filters(&self) -> ApiResult<Vec<FilterCategory>> {
        Ok(self.lock().filters.clone())
    }
}
