//! Image upload unit.
//!
//! [`UploadTracker`] is the synchronous state machine for the picked photos;
//! the [`driver`] runs the actual network uploads and feeds results back
//! through [`UploadSink`].
//!
//! ```text
//! pick ──► Uploading ──ok──► Succeeded
//!              │
//!              └──err──► Failed ──retry──► Uploading
//! ```

pub mod driver;

pub use driver::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ImageAsset, ImageId, ImageUploadState, UploadStatus};

/// Hard cap on photos per clinic.
pub const MAX_IMAGES: usize = 10;

/// Upload errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Media library permission denied")]
    PermissionDenied,

    #[error("At most {max} images allowed ({existing} selected, {picked} picked)")]
    TooManyImages {
        max: usize,
        existing: usize,
        picked: usize,
    },

    #[error("Image not found: {0}")]
    NotFound(ImageId),

    #[error("Image {0} has not failed")]
    NotRetryable(ImageId),
}

pub type UploadResult<T> = Result<T, UploadError>;

/// Media library permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaPermission {
    Granted,
    Denied,
}

/// One upload the driver should run.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadJob {
    pub id: ImageId,
    pub asset: ImageAsset,
}

/// Ordered list of picked images and their upload states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadTracker {
    images: Vec<ImageUploadState>,
    max_images: usize,
}

impl Default for UploadTracker {
    fn default() -> Self {
        Self::with_max(MAX_IMAGES)
    }
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker with a lower cap. Values above [`MAX_IMAGES`] are clamped.
    pub fn with_max(max_images: usize) -> Self {
        Self {
            images: Vec::new(),
            max_images: max_images.min(MAX_IMAGES),
        }
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    /// Append picked assets, each starting in the uploading state.
    ///
    /// A pick that would exceed the cap is rejected as a whole and leaves the
    /// existing entries untouched. Returns one job per new image.
    pub fn select_images(
        &mut self,
        permission: MediaPermission,
        picked: Vec<ImageAsset>,
    ) -> UploadResult<Vec<UploadJob>> {
        if permission == MediaPermission::Denied {
            return Err(UploadError::PermissionDenied);
        }
        if self.images.len() + picked.len() > self.max_images {
            return Err(UploadError::TooManyImages {
                max: self.max_images,
                existing: self.images.len(),
                picked: picked.len(),
            });
        }

        let jobs = picked
            .into_iter()
            .map(|asset| {
                let image = ImageUploadState::new(asset);
                let job = UploadJob {
                    id: image.id.clone(),
                    asset: image.asset.clone(),
                };
                self.images.push(image);
                job
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = jobs.len(), total = self.images.len(), "images selected");
        Ok(jobs)
    }

    /// Record the result of an upload.
    ///
    /// Returns `false` when the image was removed meanwhile (the result is
    /// discarded) or when it is no longer uploading.
    pub fn on_upload_settled(&mut self, id: &ImageId, result: Result<String, String>) -> bool {
        let Some(image) = self.images.iter_mut().find(|i| &i.id == id) else {
            tracing::debug!(image = %id, "discarding upload result for removed image");
            return false;
        };
        if !image.uploading {
            tracing::warn!(image = %id, "upload settled for an image that was not uploading");
            return false;
        }

        match result {
            Ok(url) => {
                tracing::debug!(image = %id, %url, "upload succeeded");
                image.succeed(url);
            }
            Err(message) => {
                tracing::warn!(image = %id, error = %message, "upload failed");
                image.fail(message);
            }
        }
        true
    }

    /// Put a failed image back into the uploading state.
    pub fn retry_upload(&mut self, id: &ImageId) -> UploadResult<UploadJob> {
        let image = self
            .images
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| UploadError::NotFound(id.clone()))?;
        if !image.is_failed() {
            return Err(UploadError::NotRetryable(id.clone()));
        }

        image.restart();
        Ok(UploadJob {
            id: image.id.clone(),
            asset: image.asset.clone(),
        })
    }

    /// Remove an image whatever its status.
    ///
    /// An in-flight request is not cancelled; its result is dropped by
    /// [`UploadTracker::on_upload_settled`]. A remote copy that already
    /// uploaded stays on the server.
    pub fn remove_image(&mut self, id: &ImageId) -> Option<ImageUploadState> {
        let pos = self.position(id)?;
        let removed = self.images.remove(pos);
        if removed.uploaded_url.is_some() {
            tracing::info!(image = %id, "removed an uploaded image; remote copy is kept");
        }
        Some(removed)
    }

    /// Move an image to the front so it becomes the cover.
    pub fn make_cover(&mut self, id: &ImageId) -> UploadResult<()> {
        let pos = self
            .position(id)
            .ok_or_else(|| UploadError::NotFound(id.clone()))?;
        let image = self.images.remove(pos);
        self.images.insert(0, image);
        Ok(())
    }

    pub fn cover(&self) -> Option<&ImageUploadState> {
        self.images.first()
    }

    pub fn get(&self, id: &ImageId) -> Option<&ImageUploadState> {
        self.images.iter().find(|i| &i.id == id)
    }

    pub fn position(&self, id: &ImageId) -> Option<usize> {
        self.images.iter().position(|i| &i.id == id)
    }

    pub fn images(&self) -> &[ImageUploadState] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn remaining_slots(&self) -> usize {
        self.max_images - self.images.len()
    }

    pub fn uploading_count(&self) -> usize {
        self.images.iter().filter(|i| i.uploading).count()
    }

    pub fn any_uploading(&self) -> bool {
        self.images.iter().any(|i| i.uploading)
    }

    pub fn failed_ids(&self) -> Vec<ImageId> {
        self.images
            .iter()
            .filter(|i| i.status() == UploadStatus::Failed)
            .map(|i| i.id.clone())
            .collect()
    }

    /// True when every image has an uploaded URL.
    pub fn all_uploaded(&self) -> bool {
        self.images.iter().all(|i| i.status() == UploadStatus::Succeeded)
    }

    /// Uploaded URLs in list order (cover first).
    pub fn uploaded_urls(&self) -> Vec<String> {
        self.images
            .iter()
            .filter_map(|i| i.uploaded_url.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}
