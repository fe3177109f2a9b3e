//! Client configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clinic_onboard_api::ApiConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::uploads::MAX_IMAGES;

/// Configuration errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid API base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("max_images must be between 1 and 10, got {0}")]
    InvalidMaxImages(usize),

    #[error("request_timeout_secs must be positive")]
    InvalidTimeout,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_base_url: String,
    /// Bearer token for the signed-in user
    pub api_token: Option<String>,
    /// Per-request timeout; the HTTP client default applies when unset
    pub request_timeout_secs: Option<u64>,
    /// Photo cap for the registration wizard
    pub max_images: usize,
    /// SQLite file for local flags; in-memory when unset
    pub storage_path: Option<String>,
    /// Logging level
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.physioclinic.app/v1".into(),
            api_token: None,
            request_timeout_secs: None,
            max_images: MAX_IMAGES,
            storage_path: None,
            log_level: "info".into(),
        }
    }
}

impl ClientConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("validating config {}", path.display()))?;
        Ok(config)
    }

    /// Save to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing config {}", path.display()))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.api_base_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.max_images == 0 || self.max_images > MAX_IMAGES {
            return Err(ConfigError::InvalidMaxImages(self.max_images));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_base_url.clone(),
            token: self.api_token.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}
