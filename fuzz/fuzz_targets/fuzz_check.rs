#![no_main]
use libfuzzer_sys::fuzz_target;
use permit_core::{Procedure, User};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let procedure: Procedure =
            serde_json::from_value(value.get("procedure").cloned().unwrap_or_default())
                .unwrap_or_default();
        let user: Option<User> = value
            .get("user")
            .and_then(|u| serde_json::from_value(u.clone()).ok());

        let basic = permit_engine::check_elaborate_resolution_permissions(&procedure, user.as_ref());
        let enhanced =
            permit_engine::check_enhanced_elaborate_resolution_permissions(&procedure, user.as_ref());
        assert_eq!(basic.can_elaborate, enhanced.can_elaborate);
        if procedure.director_approval == Some(1) || procedure.sent_to_reviewers != Some(1) {
            assert!(!basic.can_elaborate);
        }
    }
});
