//! End-to-end registration flow through the FFI object.
//!
//! Every test drives [`ClinicOnboardCore`] against [`MockClinicApi`]; uploads
//! run on the core's own runtime, so the tests poll until they settle.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clinic_onboard_api::{FilterCategory, FilterOption, MockClinicApi};
use clinic_onboard_core::{
    ClientConfig, ClinicOnboardCore, ClinicOnboardError, Database, FfiAccessibility, FfiAddress,
    FfiBasicInfo, FfiImage, FfiImageAsset, FfiNotice, FfiUploadStatus,
};

fn core_with(api: &Arc<MockClinicApi>) -> Arc<ClinicOnboardCore> {
    ClinicOnboardCore::with_api(
        &ClientConfig::default(),
        api.clone(),
        Database::open_in_memory().unwrap(),
    )
    .unwrap()
}

fn asset(uri: &str) -> FfiImageAsset {
    FfiImageAsset {
        uri: uri.to_string(),
        file_name: None,
        mime_type: None,
    }
}

fn wait_for_uploads(core: &ClinicOnboardCore) -> Vec<FfiImage> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let images = core.images().unwrap();
        if images.iter().all(|i| i.status != FfiUploadStatus::Uploading) {
            return images;
        }
        assert!(Instant::now() < deadline, "uploads did not settle");
        thread::sleep(Duration::from_millis(10));
    }
}

fn fill_basic_info(core: &ClinicOnboardCore) {
    core.set_basic_info(FfiBasicInfo {
        name: "Align Physio".into(),
        description: "Sports and spine rehab".into(),
        dial_code: "+91".into(),
        phone: "98765 43210".into(),
        email: "hello@alignphysio.in".into(),
        website: "alignphysio.in".into(),
        consultation_fee: Some(600.0),
    })
    .unwrap();
}

fn fill_location(core: &ClinicOnboardCore) {
    core.set_location(FfiAddress {
        line1: "12 MG Road".into(),
        line2: None,
        city: "Pune".into(),
        state: "Maharashtra".into(),
        pincode: "411001".into(),
        latitude: Some(18.52),
        longitude: Some(73.85),
    })
    .unwrap();
}

fn advance(core: &ClinicOnboardCore, expected: &str) {
    let outcome = core.next().unwrap();
    assert!(outcome.errors.is_empty(), "blocked: {:?}", outcome.errors);
    assert_eq!(outcome.step, expected);
}

/// Walk to the gallery step with every earlier step valid.
fn walk_to_gallery(core: &ClinicOnboardCore) {
    fill_basic_info(core);
    advance(core, "location");
    fill_location(core);
    advance(core, "accessibility");
    advance(core, "financials");
    advance(core, "social_links");
    advance(core, "specializations");
    core.toggle_specialization("Sports Physiotherapy".into())
        .unwrap();
    advance(core, "facilities_gallery");
    core.toggle_facility("Parking".into()).unwrap();
}

#[test]
fn test_full_registration() {
    let api = Arc::new(MockClinicApi::new());
    let core = core_with(&api);

    let blocked = core.next().unwrap();
    assert_eq!(blocked.step, "basic_info");
    assert!(blocked.errors.iter().any(|e| e.field == "name"));

    walk_to_gallery(&core);
    let ids = core
        .select_images(true, vec![asset("file:///a.jpg"), asset("file:///b.jpg")])
        .unwrap();
    assert_eq!(ids.len(), 2);
    let images = wait_for_uploads(&core);
    assert!(images.iter().all(|i| i.status == FfiUploadStatus::Succeeded));

    core.make_cover(ids[1].clone()).unwrap();
    advance(&core, "review");
    assert!(core.can_submit().unwrap());

    let created = core.submit().unwrap();
    assert_eq!(created.id, "clinic-1");
    assert_eq!(core.current_step().unwrap(), "basic_info");
    assert_eq!(core.session().clinic_id.as_deref(), Some("clinic-1"));

    let sent = &api.create_calls()[0];
    assert_eq!(sent.contact.phone, "+919876543210");
    assert_eq!(sent.specializations, vec!["Sports Physiotherapy"]);
    assert_eq!(
        sent.cover_image.as_deref(),
        Some(MockClinicApi::url_for("file:///b.jpg").as_str())
    );
    assert_eq!(sent.images.len(), 2);

    let notices = core.poll_notices().unwrap();
    assert!(notices
        .iter()
        .any(|n| matches!(n, FfiNotice::Toast { level, .. } if level == "success")));
}

#[test]
fn test_submit_blocked_while_uploading() {
    let api = Arc::new(MockClinicApi::new());
    api.hold_uploads();
    let core = core_with(&api);

    walk_to_gallery(&core);
    core.select_images(true, vec![asset("file:///a.jpg")]).unwrap();
    advance(&core, "review");

    assert!(!core.can_submit().unwrap());
    assert!(matches!(core.submit(), Err(ClinicOnboardError::Busy(_))));
    assert!(api.create_calls().is_empty());

    api.release_uploads();
    wait_for_uploads(&core);
    assert!(core.submit().is_ok());
    assert_eq!(api.create_calls().len(), 1);
}

#[test]
fn test_failed_upload_retry() {
    let api = Arc::new(MockClinicApi::new());
    api.fail_uploads("file:///b.jpg", 1);
    let core = core_with(&api);

    walk_to_gallery(&core);
    let ids = core
        .select_images(true, vec![asset("file:///a.jpg"), asset("file:///b.jpg")])
        .unwrap();
    let images = wait_for_uploads(&core);
    assert_eq!(images[1].status, FfiUploadStatus::Failed);
    assert!(images[1].error.is_some());
    assert!(core
        .poll_notices()
        .unwrap()
        .iter()
        .any(|n| matches!(n, FfiNotice::Toast { level, .. } if level == "error")));

    let a_before = images[0].uploaded_url.clone();
    core.retry_upload(ids[1].clone()).unwrap();
    let images = wait_for_uploads(&core);
    assert_eq!(images[1].status, FfiUploadStatus::Succeeded);
    assert_eq!(images[0].uploaded_url, a_before);

    // Only failed images can be retried
    assert!(matches!(
        core.retry_upload(ids[0].clone()),
        Err(ClinicOnboardError::InvalidInput(_))
    ));
}

#[test]
fn test_permission_denied_raises_alert() {
    let api = Arc::new(MockClinicApi::new());
    let core = core_with(&api);

    let err = core
        .select_images(false, vec![asset("file:///a.jpg")])
        .unwrap_err();
    assert!(matches!(err, ClinicOnboardError::PermissionDenied(_)));
    assert!(core.images().unwrap().is_empty());
    assert!(api.upload_calls().is_empty());

    let notices = core.poll_notices().unwrap();
    assert!(matches!(notices.as_slice(), [FfiNotice::Alert { .. }]));
}

#[test]
fn test_over_cap_pick_rejected() {
    let api = Arc::new(MockClinicApi::new());
    let core = core_with(&api);

    let first: Vec<_> = (0..8).map(|i| asset(&format!("file:///{}.jpg", i))).collect();
    core.select_images(true, first).unwrap();
    wait_for_uploads(&core);

    let more: Vec<_> = (8..11).map(|i| asset(&format!("file:///{}.jpg", i))).collect();
    assert!(matches!(
        core.select_images(true, more),
        Err(ClinicOnboardError::Upload(_))
    ));
    assert_eq!(core.images().unwrap().len(), 8);
}

#[test]
fn test_failed_submission_keeps_draft() {
    let api = Arc::new(MockClinicApi::new());
    api.fail_creates(1);
    let core = core_with(&api);

    walk_to_gallery(&core);
    core.select_images(true, vec![asset("file:///a.jpg")]).unwrap();
    wait_for_uploads(&core);
    advance(&core, "review");
    let payload = core.review_payload_json().unwrap();

    assert!(matches!(core.submit(), Err(ClinicOnboardError::Network(_))));
    assert_eq!(core.current_step().unwrap(), "review");
    assert_eq!(core.review_payload_json().unwrap(), payload);

    assert_eq!(core.submit().unwrap().id, "clinic-2");
}

#[test]
fn test_emergency_contact_gates_accessibility() {
    let api = Arc::new(MockClinicApi::new());
    let core = core_with(&api);
    fill_basic_info(&core);
    advance(&core, "location");
    fill_location(&core);
    advance(&core, "accessibility");

    core.set_accessibility(FfiAccessibility {
        parking_info: Some("Basement".into()),
        wheelchair_accessible: true,
        elevator: true,
        accessible_bathroom: false,
        emergency_available: true,
        emergency_contact: None,
    })
    .unwrap();
    let outcome = core.next().unwrap();
    assert_eq!(outcome.step, "accessibility");
    assert_eq!(outcome.errors[0].field, "emergency_services.contact_number");

    assert_eq!(core.back().unwrap(), "location");
    assert!(core.go_to_step("basic_info".into()).unwrap());
    assert!(!core.go_to_step("review".into()).unwrap());
}

#[test]
fn test_cancel_discards_everything() {
    let api = Arc::new(MockClinicApi::new());
    let core = core_with(&api);
    walk_to_gallery(&core);
    core.add_insurance_provider("Star Health".into()).unwrap();

    core.cancel().unwrap();
    assert_eq!(core.current_step().unwrap(), "basic_info");
    assert!(core.insurance_providers().unwrap().is_empty());
    assert!(core.images().unwrap().is_empty());
}

#[test]
fn test_insurance_provider_removal() {
    let api = Arc::new(MockClinicApi::new());
    let core = core_with(&api);

    let star = core.add_insurance_provider("Star Health".into()).unwrap();
    let hdfc = core.add_insurance_provider("HDFC Ergo".into()).unwrap();
    core.add_policy_type(star, "Family Floater".into()).unwrap();
    core.add_policy_type(hdfc, "Individual".into()).unwrap();

    core.remove_insurance_provider(star).unwrap();
    let providers = core.insurance_providers().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].provider, "HDFC Ergo");
    assert_eq!(providers[0].policy_types, vec!["Individual"]);

    assert!(matches!(
        core.remove_insurance_provider(7),
        Err(ClinicOnboardError::NotFound(_))
    ));
    assert!(core.add_insurance_provider("  ".into()).is_err());
}

#[test]
fn test_unknown_chip_rejected() {
    let api = Arc::new(MockClinicApi::new());
    let core = core_with(&api);
    assert!(matches!(
        core.toggle_facility("Helipad".into()),
        Err(ClinicOnboardError::InvalidInput(_))
    ));
    assert_eq!(core.toggle_facility("Wi-Fi".into()).unwrap(), vec!["Wi-Fi"]);
    assert!(core.toggle_facility("Wi-Fi".into()).unwrap().is_empty());
}

#[test]
fn test_filter_sheet_applies_and_reopens() {
    let api = Arc::new(MockClinicApi::new().with_filters(vec![FilterCategory {
        name: "bodyPart".into(),
        label: Some("Body part".into()),
        options: vec![
            FilterOption { id: "knee".into(), label: "Knee".into() },
            FilterOption { id: "shoulder".into(), label: "Shoulder".into() },
        ],
    }]));
    let core = core_with(&api);
    assert!(core.applied_filters().unwrap().is_empty());

    core.open_filter_sheet().unwrap();
    assert!(core.toggle_filter("bodyPart".into(), "knee".into()).unwrap());
    let applied = core.confirm_filters().unwrap();
    assert_eq!(applied, core.applied_filters().unwrap());
    assert_eq!(applied[0].category, "bodyPart");
    assert_eq!(applied[0].option_ids, vec!["knee"]);

    // Reopening seeds the sheet; cancelling keeps what was applied
    let categories = core.open_filter_sheet().unwrap();
    assert!(categories[0].options[0].selected);
    core.toggle_filter("bodyPart".into(), "shoulder".into()).unwrap();
    core.cancel_filters().unwrap();
    assert_eq!(core.applied_filters().unwrap()[0].option_ids, vec!["knee"]);
}

#[test]
fn test_draft_editable_after_submission() {
    let api = Arc::new(MockClinicApi::new());
    let core = core_with(&api);
    walk_to_gallery(&core);
    core.select_images(true, vec![asset("file:///a.jpg")]).unwrap();
    wait_for_uploads(&core);
    advance(&core, "review");
    core.submit().unwrap();

    // A fresh draft is editable straight after a completed submission
    fill_basic_info(&core);
    assert_eq!(core.current_step().unwrap(), "basic_info");
    assert!(core.next().unwrap().errors.is_empty());
}
