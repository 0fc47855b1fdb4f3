#![forbid(unsafe_code)]

pub mod policy;
pub mod state;

pub use policy::checker::{
    check_elaborate_resolution_permissions, evaluate_elaborate_resolution_permissions,
    ResolutionPermissionChecker,
};
pub use policy::decision::{
    Authority, Denial, ElaboratePermission, EnhancedPermission, Evaluation, StateAssessment,
};
pub use policy::enhanced::{
    check_enhanced_elaborate_resolution_permissions, EnhancedPermissionChecker,
};
pub use state::classifier::is_procedure_in_elaborate_state;
