#![forbid(unsafe_code)]

pub mod errors;
pub mod records;
pub mod roles;
pub mod traits;
pub mod types;

pub use records::{Procedure, User};
pub use roles::{classify_role, RoleTable};
pub use types::{ProcedureState, RoleClass};
