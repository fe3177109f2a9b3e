//! Wire types exchanged with the clinic backend.
//!
//! The backend speaks camelCase JSON. Optional response fields default when
//! absent or null so older servers keep deserializing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// =========================================================================
// Operating hours
// =========================================================================

/// A single open/close interval within one day, in 24h `HH:MM` form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shift {
    pub open: String,
    pub close: String,
}

impl Shift {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Schedule for one weekday.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

impl DaySchedule {
    /// An open day with a single shift.
    pub fn single(open: &str, close: &str) -> Self {
        Self {
            is_closed: false,
            shifts: vec![Shift::new(open, close)],
        }
    }

    pub fn closed() -> Self {
        Self {
            is_closed: true,
            shifts: Vec::new(),
        }
    }
}

/// Per-weekday schedule. Missing days are treated as closed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DaySchedule>,
}

/// Operating hours as published by a clinic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    /// Clinic never closes; the schedule is ignored.
    #[serde(default)]
    pub open_24hrs: bool,
    #[serde(default)]
    pub schedule: WeeklySchedule,
}

// =========================================================================
// Clinic summary
// =========================================================================

/// Dashboard summary for the signed-in clinic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_patients: Option<u32>,
    #[serde(default)]
    pub today_appointments: Option<u32>,
    #[serde(default)]
    pub operating_hours: Option<OperatingHours>,
}

// =========================================================================
// Registration payload
// =========================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Accessibility {
    #[serde(default)]
    pub parking_info: Option<String>,
    #[serde(default)]
    pub wheelchair_accessible: bool,
    #[serde(default)]
    pub elevator: bool,
    #[serde(default)]
    pub accessible_bathroom: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyServices {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub contact_number: Option<String>,
}

/// An accepted insurance provider and its policy types.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceProvider {
    pub provider: String,
    #[serde(default)]
    pub policy_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    /// Percentage retained by the platform (0-100).
    #[serde(default)]
    pub platform_commission_rate: f64,
    #[serde(default)]
    pub gst_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentConfig {
    /// Minutes per bookable slot
    pub slot_duration: u32,
    /// Minutes between consecutive slots
    pub buffer_time: u32,
    /// Days ahead a patient may book
    pub advance_booking_limit: u32,
    #[serde(default)]
    pub instant_booking: bool,
    #[serde(default)]
    pub virtual_consultation: bool,
}

impl Default for AppointmentConfig {
    fn default() -> Self {
        Self {
            slot_duration: 30,
            buffer_time: 0,
            advance_booking_limit: 30,
            instant_booking: false,
            virtual_consultation: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomeVisitConfig {
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub radius_km: f64,
    #[serde(default)]
    pub travel_fee: f64,
    #[serde(default)]
    pub min_booking_amount: f64,
}

/// Contact block of the create-clinic request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Body of the create-clinic call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateClinicRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub contact: Contact,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_fee: Option<f64>,
    pub accessibility: Accessibility,
    pub emergency_services: EmergencyServices,
    pub facilities: Vec<String>,
    pub specializations: Vec<String>,
    pub insurance_accepted: Vec<InsuranceProvider>,
    pub social_links: SocialLinks,
    pub financials: Financials,
    pub appointment_config: AppointmentConfig,
    pub home_visit_config: HomeVisitConfig,
    pub operating_hours: OperatingHours,
    /// Uploaded image URLs, cover first
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateClinicResponse {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

// =========================================================================
// Image upload
// =========================================================================

/// A locally picked image, referenced by platform URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub uri: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl ImageAsset {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            file_name: None,
            mime_type: None,
        }
    }

    /// File name to send with the upload, falling back to the URI's last segment.
    pub fn upload_name(&self) -> String {
        if let Some(name) = &self.file_name {
            return name.clone();
        }
        self.uri
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("image.jpg")
            .to_string()
    }

    /// MIME type to send with the upload.
    pub fn upload_mime(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("image/jpeg")
    }

    /// Local filesystem path for `file://` URIs and bare paths.
    pub fn local_path(&self) -> &str {
        self.uri.strip_prefix("file://").unwrap_or(&self.uri)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    #[serde(alias = "imageUrl", alias = "secure_url")]
    pub url: String,
    #[serde(default)]
    pub content_key: Option<String>,
}

/// Content-addressed key for upload bytes (hex SHA-256).
///
/// Re-uploading the same bytes yields the same key, so a retried upload
/// overwrites rather than duplicates the stored object.
pub fn content_key(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// =========================================================================
// Exercise filters
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOption {
    #[serde(alias = "_id")]
    pub id: String,
    pub label: String,
}

/// A filter category (body part, difficulty, equipment, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCategory {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub options: Vec<FilterOption>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterResponse {
    #[serde(default)]
    pub filters: Vec<FilterCategory>,
}

// =========================================================================
// Envelope
// =========================================================================

/// Responses arrive either bare or wrapped as `{"success": .., "data": ..}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operating_hours_wire_shape() {
        let json = r#"{
            "open24hrs": false,
            "schedule": {
                "monday": {"isClosed": false, "shifts": [{"open": "09:00", "close": "17:00"}]},
                "sunday": {"isClosed": true}
            }
        }"#;

        let hours: OperatingHours = serde_json::from_str(json).unwrap();
        assert!(!hours.open_24hrs);
        let monday = hours.schedule.monday.unwrap();
        assert_eq!(monday.shifts, vec![Shift::new("09:00", "17:00")]);
        assert!(hours.schedule.sunday.unwrap().is_closed);
        assert!(hours.schedule.tuesday.is_none());
    }

    #[test]
    fn test_summary_tolerates_missing_fields() {
        let summary: ClinicSummary =
            serde_json::from_str(r#"{"id": "c1", "name": "Spine Care", "rating": null}"#).unwrap();
        assert_eq!(summary.name, "Spine Care");
        assert!(summary.rating.is_none());
        assert!(summary.operating_hours.is_none());
    }

    #[test]
    fn test_envelope_wrapped_and_bare() {
        let wrapped: Envelope<CreateClinicResponse> =
            serde_json::from_str(r#"{"success": true, "data": {"_id": "abc"}}"#).unwrap();
        assert_eq!(wrapped.into_inner().id, "abc");

        let bare: Envelope<CreateClinicResponse> =
            serde_json::from_str(r#"{"id": "xyz", "status": "pending"}"#).unwrap();
        let bare = bare.into_inner();
        assert_eq!(bare.id, "xyz");
        assert_eq!(bare.status.as_deref(), Some("pending"));
    }

    #[test]
    fn test_create_request_camel_case() {
        let request = CreateClinicRequest {
            name: "Spine Care".into(),
            consultation_fee: Some(500.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("consultationFee").is_some());
        assert!(value.get("insuranceAccepted").is_some());
        assert!(value.get("homeVisitConfig").is_some());
        assert!(value["operatingHours"].get("open24hrs").is_some());
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_uploaded_image_aliases() {
        let image: UploadedImage =
            serde_json::from_str(r#"{"imageUrl": "https://cdn/x.jpg"}"#).unwrap();
        assert_eq!(image.url, "https://cdn/x.jpg");
    }

    #[test]
    fn test_asset_upload_name() {
        let asset = ImageAsset::new("file:///data/picks/front.png");
        assert_eq!(asset.upload_name(), "front.png");
        assert_eq!(asset.local_path(), "/data/picks/front.png");
        assert_eq!(asset.upload_mime(), "image/jpeg");
    }

    #[test]
    fn test_content_key_stable() {
        let a = content_key(b"pixels");
        let b = content_key(b"pixels");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_key(b"other pixels"));
    }
}
