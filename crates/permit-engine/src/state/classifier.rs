use permit_core::{Procedure, ProcedureState};

use crate::policy::decision::StateAssessment;

/// Decide whether a procedure's workflow state admits a resolution.
///
/// Gate order:
/// 1. director approval lock
/// 2. not sent to reviewers
/// 3. closed statuses (rejected, director approved, license issued)
/// 4. open statuses (pending review, prevention, pending)
/// 5. anything else is unknown and blocked
pub fn is_procedure_in_elaborate_state(procedure: &Procedure) -> StateAssessment {
    let state = ProcedureState::of(procedure);
    StateAssessment {
        can_elaborate: state.is_elaborable(),
        state_reason: state.reason(),
        state,
    }
}
