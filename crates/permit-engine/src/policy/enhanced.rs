use permit_core::traits::{AssignmentResolver, NoAssignment};
use permit_core::{Procedure, User};

use super::checker::{legacy_checker, ResolutionPermissionChecker};
use super::decision::{EnhancedPermission, Evaluation};

/// Decorates the basic checker with a reason string and assignment data.
///
/// The decision fields are copied from the basic evaluation unchanged. The
/// resolver runs only for permitted users; its failures are logged and
/// otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct EnhancedPermissionChecker<R = NoAssignment> {
    checker: ResolutionPermissionChecker,
    resolver: R,
}

impl EnhancedPermissionChecker<NoAssignment> {
    pub fn new(checker: ResolutionPermissionChecker) -> Self {
        Self {
            checker,
            resolver: NoAssignment,
        }
    }
}

impl<R: AssignmentResolver> EnhancedPermissionChecker<R> {
    pub fn with_resolver(checker: ResolutionPermissionChecker, resolver: R) -> Self {
        Self { checker, resolver }
    }

    pub fn check(&self, procedure: &Procedure, user: Option<&User>) -> EnhancedPermission {
        let evaluation = self.checker.evaluate(procedure, user);
        decorate(&evaluation, procedure, user, &self.resolver)
    }
}

fn decorate(
    evaluation: &Evaluation,
    procedure: &Procedure,
    user: Option<&User>,
    resolver: &dyn AssignmentResolver,
) -> EnhancedPermission {
    let permission = evaluation.permission();
    let mut enhanced = EnhancedPermission {
        can_elaborate: permission.can_elaborate,
        is_director: permission.is_director,
        reason: evaluation.reason(),
        is_assigned_reviewer: None,
        department_assignment: None,
    };
    if !permission.can_elaborate {
        return enhanced;
    }
    enhanced.is_assigned_reviewer = Some(!permission.is_director);

    if let Some(user) = user {
        match resolver.department_assignment(procedure, user) {
            Ok(assignment) => enhanced.department_assignment = assignment,
            Err(e) => tracing::warn!(
                procedure = %procedure.label(),
                role_id = ?user.role_id,
                error = %e,
                "department assignment lookup failed"
            ),
        }
    }
    enhanced
}

/// Enhanced check under the legacy role table, with no assignment source.
pub fn check_enhanced_elaborate_resolution_permissions(
    procedure: &Procedure,
    user: Option<&User>,
) -> EnhancedPermission {
    let evaluation = legacy_checker().evaluate(procedure, user);
    decorate(&evaluation, procedure, user, &NoAssignment)
}
