//! Fixed option vocabularies offered as chips in the registration wizard.

/// At most this many specializations can be picked.
pub const MAX_SPECIALIZATIONS: usize = 5;

/// Facilities a clinic can advertise.
pub const FACILITIES: &[&str] = &[
    "Parking",
    "Wheelchair Access",
    "Air Conditioning",
    "Waiting Area",
    "Wi-Fi",
    "Pharmacy",
    "Laboratory",
    "X-Ray",
    "Gym Equipment",
    "Hydrotherapy Pool",
    "Changing Rooms",
    "Drinking Water",
    "Card Payment",
    "Home Visits",
];

/// Physiotherapy specializations.
pub const SPECIALIZATIONS: &[&str] = &[
    "Orthopedic Physiotherapy",
    "Neurological Physiotherapy",
    "Sports Physiotherapy",
    "Pediatric Physiotherapy",
    "Geriatric Physiotherapy",
    "Cardiopulmonary Rehabilitation",
    "Women's Health",
    "Manual Therapy",
    "Post-Surgical Rehabilitation",
    "Pain Management",
    "Vestibular Rehabilitation",
    "Ergonomics",
];
