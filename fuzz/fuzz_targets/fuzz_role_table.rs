#![no_main]
use libfuzzer_sys::fuzz_target;
use permit_core::RoleTable;

fuzz_target!(|data: &[u8]| {
    if let Ok(table) = serde_json::from_slice::<RoleTable>(data) {
        if table.validate().is_ok() {
            for id in [-1, 0, 1, 4, 6, 7, i64::MAX] {
                let class = table.classify(id);
                let _ = table.label(id);
                if id > table.citizen_floor && class.is_technical_reviewer() {
                    assert!(class.can_access_procedure_approvals());
                }
            }
        }
    }
});
