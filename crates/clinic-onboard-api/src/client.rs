//! The [`ClinicApi`] seam and its reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, multipart, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::types::{
    content_key, ClinicSummary, CreateClinicRequest, CreateClinicResponse, Envelope,
    FilterCategory, FilterResponse, ImageAsset, UploadedImage,
};

/// API client errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Could not read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not authorized")]
    Unauthorized,

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Raised by test doubles and by callers that short-circuit a request.
    #[error("Request failed: {0}")]
    Other(String),
}

impl ApiError {
    /// Connection and timeout failures, plus 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote operations the client core depends on.
#[async_trait]
pub trait ClinicApi: Send + Sync {
    /// Fetch the dashboard summary of the signed-in clinic.
    async fn get_clinic_summary(&self) -> ApiResult<ClinicSummary>;

    /// Upload one picked image and return its public URL.
    async fn upload_image(&self, asset: &ImageAsset) -> ApiResult<UploadedImage>;

    /// Create a clinic from an assembled registration.
    async fn create_clinic(&self, request: &CreateClinicRequest) -> ApiResult<CreateClinicResponse>;

    /// Fetch the filter categories for the exercise library.
    async fn get_exercise_filters(&self) -> ApiResult<Vec<FilterCategory>>;
}

/// Connection settings for [`HttpClinicApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    /// `None` keeps reqwest's default.
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: None,
        }
    }
}

/// JSON-over-HTTPS implementation of [`ClinicApi`].
pub struct HttpClinicApi {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpClinicApi {
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        // Url::join drops the last path segment unless it ends with a slash
        let mut base = config.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &config.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::Other(format!("Invalid token: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            http: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.into_inner())
    }
}

#[async_trait]
impl ClinicApi for HttpClinicApi {
    async fn get_clinic_summary(&self) -> ApiResult<ClinicSummary> {
        let url = self.endpoint("clinic/summary")?;
        tracing::debug!(%url, "fetching clinic summary");
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn upload_image(&self, asset: &ImageAsset) -> ApiResult<UploadedImage> {
        let bytes = tokio::fs::read(asset.local_path()).await?;
        let key = content_key(&bytes);
        let size = bytes.len();

        let part = multipart::Part::bytes(bytes)
            .file_name(asset.upload_name())
            .mime_str(asset.upload_mime())?;
        let form = multipart::Form::new()
            .text("contentKey", key.clone())
            .part("image", part);

        let url = self.endpoint("uploads/image")?;
        tracing::debug!(%url, size, key = %key, "uploading image");
        let response = self.http.post(url).multipart(form).send().await?;

        let mut uploaded: UploadedImage = Self::decode(response).await?;
        uploaded.content_key.get_or_insert(key);
        Ok(uploaded)
    }

    async fn create_clinic(&self, request: &CreateClinicRequest) -> ApiResult<CreateClinicResponse> {
        let url = self.endpoint("clinics")?;
        tracing::info!(%url, name = %request.name, "creating clinic");
        let response = self.http.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn get_exercise_filters(&self) -> ApiResult<Vec<FilterCategory>> {
        let url = self.endpoint("exercises/filters")?;
        let response = self.http.get(url).send().await?;
        let filters: FilterResponse = Self::decode(response).await?;
        Ok(filters.filters)
    }
}
