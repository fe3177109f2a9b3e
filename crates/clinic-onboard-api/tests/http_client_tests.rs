//! HTTP client tests against a local mock server.

use std::io::Write;

use clinic_onboard_api::{
    content_key, ApiConfig, ApiError, ClinicApi, CreateClinicRequest, HttpClinicApi, ImageAsset,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, token: Option<&str>) -> HttpClinicApi {
    let mut config = ApiConfig::new(format!("{}/v1", server.uri()));
    config.token = token.map(str::to_string);
    HttpClinicApi::new(config).unwrap()
}

#[tokio::test]
async fn test_summary_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/clinic/summary"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c-9",
            "name": "Align Physio",
            "totalPatients": 42
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client(&server, Some("secret-token"))
        .get_clinic_summary()
        .await
        .unwrap();
    assert_eq!(summary.id, "c-9");
    assert_eq!(summary.total_patients, Some(42));
}

#[tokio::test]
async fn test_unauthorized_maps_to_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/clinic/summary"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let err = client(&server, None).get_clinic_summary().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_error_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/clinics"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let request = CreateClinicRequest {
        name: "Align Physio".into(),
        ..Default::default()
    };
    match client(&server, None).create_clinic(&request).await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_clinic_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/clinics"))
        .and(body_partial_json(json!({ "name": "Align Physio" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": { "_id": "clinic-77", "status": "pending_verification" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateClinicRequest {
        name: "Align Physio".into(),
        ..Default::default()
    };
    let created = client(&server, None).create_clinic(&request).await.unwrap();
    assert_eq!(created.id, "clinic-77");
    assert_eq!(created.status.as_deref(), Some("pending_verification"));
}

#[tokio::test]
async fn test_upload_sends_multipart_with_content_key() {
    let bytes = b"not really a jpeg";
    let key = content_key(bytes);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/uploads/image"))
        .and(body_string_contains("name=\"contentKey\""))
        .and(body_string_contains(key.as_str()))
        .and(body_string_contains("filename=\"front.jpg\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "imageUrl": "https://cdn.example.test/front.jpg" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let asset = ImageAsset {
        uri: format!("file://{}", file.path().display()),
        file_name: Some("front.jpg".into()),
        mime_type: None,
    };
    let uploaded = client(&server, None).upload_image(&asset).await.unwrap();
    assert_eq!(uploaded.url, "https://cdn.example.test/front.jpg");
    assert_eq!(uploaded.content_key.as_deref(), Some(key.as_str()));
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let asset = ImageAsset::new("file:///definitely/not/here.jpg");
    let err = client(&server, None).upload_image(&asset).await.unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
}

#[tokio::test]
async fn test_exercise_filters_unwrap_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/exercises/filters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filters": [
                {
                    "name": "bodyPart",
                    "label": "Body part",
                    "options": [
                        { "_id": "knee", "label": "Knee" },
                        { "_id": "shoulder", "label": "Shoulder" }
                    ]
                },
                { "name": "difficulty" }
            ]
        })))
        .mount(&server)
        .await;

    let filters = client(&server, None).get_exercise_filters().await.unwrap();
    assert_eq!(filters.len(), 2);
    assert_eq!(filters[0].name, "bodyPart");
    assert_eq!(filters[0].options[1].id, "shoulder");
    assert!(filters[1].options.is_empty());
}
