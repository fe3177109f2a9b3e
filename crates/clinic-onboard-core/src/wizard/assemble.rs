//! Shapes a validated draft into the create-clinic request.

use clinic_onboard_api::{Contact, CreateClinicRequest, SocialLinks};

use super::validation::normalize_url;
use crate::models::RegistrationDraft;

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn link(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .and_then(non_empty)
        .and_then(|v| normalize_url(&v))
}

/// Build the request body. Callers validate the draft first.
pub fn assemble(draft: &RegistrationDraft) -> CreateClinicRequest {
    let images = draft.images.uploaded_urls();

    let mut address = draft.address.clone();
    address.line1 = address.line1.trim().to_string();
    address.line2 = address.line2.as_deref().and_then(non_empty);
    address.city = address.city.trim().to_string();
    address.state = address.state.trim().to_string();
    address.pincode = address.pincode.trim().to_string();

    let mut emergency_services = draft.emergency_services.clone();
    if !emergency_services.available {
        emergency_services.contact_number = None;
    }

    let mut accessibility = draft.accessibility.clone();
    accessibility.parking_info = accessibility.parking_info.as_deref().and_then(non_empty);

    let mut financials = draft.financials.clone();
    financials.gst_number = financials
        .gst_number
        .as_deref()
        .and_then(non_empty)
        .map(|gst| gst.to_uppercase());

    let mut home_visit_config = draft.home_visit_config.clone();
    if !home_visit_config.is_available {
        home_visit_config = Default::default();
    }

    CreateClinicRequest {
        name: draft.name.trim().to_string(),
        description: non_empty(&draft.description),
        contact: Contact {
            phone: draft.phone.to_e164(),
            email: non_empty(&draft.email).map(|e| e.to_lowercase()),
            website: non_empty(&draft.website).and_then(|w| normalize_url(&w)),
        },
        address,
        consultation_fee: draft.consultation_fee,
        accessibility,
        emergency_services,
        facilities: draft.facilities.to_vec(),
        specializations: draft.specializations.to_vec(),
        insurance_accepted: draft.insurance.providers().to_vec(),
        social_links: SocialLinks {
            facebook: link(&draft.social_links.facebook),
            instagram: link(&draft.social_links.instagram),
            youtube: link(&draft.social_links.youtube),
        },
        financials,
        appointment_config: draft.appointment_config.clone(),
        home_visit_config,
        operating_hours: draft.operating_hours.clone(),
        cover_image: images.first().cloned(),
        images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageAsset, PhoneNumber};
    use crate::uploads::MediaPermission;

    #[test]
    fn test_assemble_shapes_fields() {
        let mut draft = RegistrationDraft::new();
        draft.name = "  Align Physio ".into();
        draft.phone = PhoneNumber::new("+91", "98765-43210");
        draft.email = "Hello@AlignPhysio.in".into();
        draft.website = "alignphysio.in".into();
        draft.description = "   ".into();
        draft.financials.gst_number = Some("27aapfu0939f1zv".into());
        draft.social_links.facebook = Some("facebook.com/align".into());
        draft.social_links.youtube = Some("".into());
        draft.emergency_services.contact_number = Some("112".into());
        draft.home_visit_config.radius_km = 5.0;
        draft.facilities.toggle("Parking");
        draft.insurance.add_provider("Star Health");
        draft.insurance.add_policy_type(0, "Family Floater");

        let jobs = draft
            .images
            .select_images(
                MediaPermission::Granted,
                vec![ImageAsset::new("file:///a.jpg"), ImageAsset::new("file:///b.jpg")],
            )
            .unwrap();
        draft.images.on_upload_settled(&jobs[0].id, Ok("https://cdn/a.jpg".into()));
        draft.images.on_upload_settled(&jobs[1].id, Ok("https://cdn/b.jpg".into()));
        draft.images.make_cover(&jobs[1].id).unwrap();

        let request = assemble(&draft);
        assert_eq!(request.name, "Align Physio");
        assert_eq!(request.description, None);
        assert_eq!(request.contact.phone, "+919876543210");
        assert_eq!(request.contact.email.as_deref(), Some("hello@alignphysio.in"));
        assert_eq!(request.contact.website.as_deref(), Some("https://alignphysio.in/"));
        assert_eq!(request.financials.gst_number.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(
            request.social_links.facebook.as_deref(),
            Some("https://facebook.com/align")
        );
        assert_eq!(request.social_links.youtube, None);
        // Contact number is dropped when the service is not offered
        assert_eq!(request.emergency_services.contact_number, None);
        assert_eq!(request.home_visit_config.radius_km, 0.0);
        assert_eq!(request.facilities, vec!["Parking"]);
        assert_eq!(request.insurance_accepted[0].policy_types, vec!["Family Floater"]);
        assert_eq!(request.images, vec!["https://cdn/b.jpg", "https://cdn/a.jpg"]);
        assert_eq!(request.cover_image.as_deref(), Some("https://cdn/b.jpg"));
    }
}
