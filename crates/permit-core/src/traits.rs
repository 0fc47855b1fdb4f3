use crate::errors::AssignmentError;
use crate::records::{Procedure, User};

/// Looks up which department a reviewer is assigned to for a procedure.
///
/// Consulted only after the core decision has already permitted the user;
/// it decorates the result and never changes it.
pub trait AssignmentResolver {
    fn department_assignment(
        &self,
        procedure: &Procedure,
        user: &User,
    ) -> Result<Option<String>, AssignmentError>;
}

/// Resolver used until per-department assignments are wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssignment;

impl AssignmentResolver for NoAssignment {
    fn department_assignment(
        &self,
        _procedure: &Procedure,
        _user: &User,
    ) -> Result<Option<String>, AssignmentError> {
        Ok(None)
    }
}

impl<R: AssignmentResolver + ?Sized> AssignmentResolver for &R {
    fn department_assignment(
        &self,
        procedure: &Procedure,
        user: &User,
    ) -> Result<Option<String>, AssignmentError> {
        (**self).department_assignment(procedure, user)
    }
}
