//! Per-image upload state.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use clinic_onboard_api::ImageAsset;

/// Stable identifier for a picked image.
///
/// Upload completions are routed by id rather than list position, so a
/// removal that shifts the list cannot redirect a late result into the
/// wrong slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(String);

impl ImageId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derived upload status of an image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UploadStatus {
    /// Picked, upload not started
    Pending,
    /// Request in flight
    Uploading,
    /// Uploaded, URL known
    Succeeded,
    /// Last attempt failed; retryable
    Failed,
}

/// One selected photo and the state of its upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUploadState {
    pub id: ImageId,
    /// Local asset reference
    pub asset: ImageAsset,
    /// Remote URL once the upload succeeded
    pub uploaded_url: Option<String>,
    pub uploading: bool,
    /// Message from the last failed attempt
    pub error: Option<String>,
}

impl ImageUploadState {
    /// A freshly picked image whose upload is about to start.
    pub fn new(asset: ImageAsset) -> Self {
        Self {
            id: ImageId::generate(),
            asset,
            uploaded_url: None,
            uploading: true,
            error: None,
        }
    }

    pub fn status(&self) -> UploadStatus {
        if self.uploading {
            UploadStatus::Uploading
        } else if self.uploaded_url.is_some() {
            UploadStatus::Succeeded
        } else if self.error.is_some() {
            UploadStatus::Failed
        } else {
            UploadStatus::Pending
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status() == UploadStatus::Failed
    }

    pub(crate) fn succeed(&mut self, url: String) {
        self.uploaded_url = Some(url);
        self.uploading = false;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.uploading = false;
        self.error = Some(message);
    }

    pub(crate) fn restart(&mut self) {
        self.uploading = true;
        self.error = None;
    }
}
