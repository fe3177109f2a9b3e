//! Runs uploads concurrently and writes results back by image id.

use std::sync::{Arc, Mutex};

use clinic_onboard_api::ClinicApi;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{UploadJob, UploadTracker};
use crate::models::ImageId;

/// Receives upload results.
///
/// Implementors own an [`UploadTracker`] somewhere behind a lock. Settling
/// must not block on I/O.
pub trait UploadSink: Send + Sync + 'static {
    /// Returns `false` when the result was discarded.
    fn settle(&self, id: &ImageId, result: Result<String, String>) -> bool;
}

impl UploadSink for Mutex<UploadTracker> {
    fn settle(&self, id: &ImageId, result: Result<String, String>) -> bool {
        let mut tracker = self.lock().unwrap_or_else(|e| e.into_inner());
        tracker.on_upload_settled(id, result)
    }
}

/// Spawn one upload. The task resolves to whether its result was applied.
pub fn spawn_upload(
    handle: &Handle,
    api: Arc<dyn ClinicApi>,
    sink: Arc<dyn UploadSink>,
    job: UploadJob,
) -> JoinHandle<bool> {
    handle.spawn(async move {
        let result = api
            .upload_image(&job.asset)
            .await
            .map(|uploaded| uploaded.url)
            .map_err(|e| e.to_string());
        sink.settle(&job.id, result)
    })
}

/// Spawn every job independently; none waits on another.
pub fn spawn_uploads(
    handle: &Handle,
    api: Arc<dyn ClinicApi>,
    sink: Arc<dyn UploadSink>,
    jobs: Vec<UploadJob>,
) -> Vec<JoinHandle<bool>> {
    jobs.into_iter()
        .map(|job| spawn_upload(handle, Arc::clone(&api), Arc::clone(&sink), job))
        .collect()
}
