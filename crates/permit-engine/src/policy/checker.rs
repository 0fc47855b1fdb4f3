use std::sync::OnceLock;

use permit_core::types::status;
use permit_core::{Procedure, RoleTable, User};

use super::decision::{Authority, Denial, ElaboratePermission, Evaluation};
use crate::state::classifier::is_procedure_in_elaborate_state;

/// Resolution permission checker, fail-closed.
///
/// Evaluation order:
/// 1. User present with a role above the citizen floor
/// 2. Role can access procedure approvals
/// 3. Procedure state admits a resolution (blocks every role)
/// 4. Technical reviewer: status 2/4 blocked, pending/review/prevention allowed
/// 5. Director: allowed with director authority
/// 6. Legacy specialized department: allowed without director authority
/// 7. Anything else is denied
#[derive(Debug, Clone, Default)]
pub struct ResolutionPermissionChecker {
    roles: RoleTable,
}

impl ResolutionPermissionChecker {
    pub fn new(roles: RoleTable) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn check(&self, procedure: &Procedure, user: Option<&User>) -> ElaboratePermission {
        self.evaluate(procedure, user).permission()
    }

    pub fn evaluate(&self, procedure: &Procedure, user: Option<&User>) -> Evaluation {
        let evaluation = self.decide(procedure, user);
        tracing::debug!(
            procedure = %procedure.label(),
            role_id = ?user.and_then(|u| u.role_id),
            role_name = ?user.and_then(|u| u.role_name.as_deref()),
            status = ?procedure.status,
            can_elaborate = evaluation.permission().can_elaborate,
            "resolution permission evaluated"
        );
        evaluation
    }

    fn decide(&self, procedure: &Procedure, user: Option<&User>) -> Evaluation {
        // 1. Identity and citizen floor
        let Some(user) = user else {
            return Evaluation::denied(Denial::NoUser);
        };
        let role_id = match user.role_id {
            None | Some(0) => return Evaluation::denied(Denial::MissingRole),
            Some(id) => id,
        };
        if role_id <= self.roles.citizen_floor {
            return Evaluation::denied(Denial::BelowCitizenFloor { role_id });
        }

        // 2. General approvals access
        let role = self.roles.classify(role_id);
        if !role.can_access_procedure_approvals() {
            return Evaluation::denied(Denial::NoApprovalAccess { role_id });
        }

        // 3. State gate applies to every role
        let assessment = is_procedure_in_elaborate_state(procedure);
        if !assessment.can_elaborate {
            return Evaluation::denied(Denial::State {
                state: assessment.state,
                reason: assessment.state_reason,
            });
        }
        let state = assessment.state;

        // 4. Reviewers are checked before directors
        if role.is_technical_reviewer() {
            return match procedure.status {
                None
                | Some(status::PENDING)
                | Some(status::PENDING_REVIEW)
                | Some(status::PREVENTION) => Evaluation::Granted {
                    authority: Authority::TechnicalReviewer,
                    state,
                },
                Some(other) => Evaluation::denied(Denial::ReviewerStatusBlocked { status: other }),
            };
        }

        // 5.
        if role.is_director() {
            return Evaluation::Granted {
                authority: Authority::Director,
                state,
            };
        }

        // 6.
        if role.is_specialized_department() {
            return Evaluation::Granted {
                authority: Authority::Department,
                state,
            };
        }

        Evaluation::denied(Denial::UnrecognizedRole { role_id })
    }
}

pub(crate) fn legacy_checker() -> &'static ResolutionPermissionChecker {
    static CHECKER: OnceLock<ResolutionPermissionChecker> = OnceLock::new();
    CHECKER.get_or_init(ResolutionPermissionChecker::default)
}

/// Decide whether `user` may elaborate a resolution for `procedure`, under
/// the legacy role table.
pub fn check_elaborate_resolution_permissions(
    procedure: &Procedure,
    user: Option<&User>,
) -> ElaboratePermission {
    legacy_checker().check(procedure, user)
}

/// Same decision with the denial or grant detail kept.
pub fn evaluate_elaborate_resolution_permissions(
    procedure: &Procedure,
    user: Option<&User>,
) -> Evaluation {
    legacy_checker().evaluate(procedure, user)
}
