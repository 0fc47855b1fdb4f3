use std::fmt;

use permit_core::ProcedureState;
use serde::{Deserialize, Serialize};

/// Outcome of the procedure-state check alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAssessment {
    pub can_elaborate: bool,
    pub state_reason: String,
    pub state: ProcedureState,
}

/// Basic permission decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElaboratePermission {
    pub can_elaborate: bool,
    pub is_director: bool,
}

impl ElaboratePermission {
    pub const DENIED: Self = Self {
        can_elaborate: false,
        is_director: false,
    };
}

/// Basic decision plus diagnostics and assignment data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedPermission {
    pub can_elaborate: bool,
    pub is_director: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_assigned_reviewer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_assignment: Option<String>,
}

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "denial")]
pub enum Denial {
    NoUser,
    MissingRole,
    BelowCitizenFloor { role_id: i64 },
    NoApprovalAccess { role_id: i64 },
    State { state: ProcedureState, reason: String },
    ReviewerStatusBlocked { status: i64 },
    UnrecognizedRole { role_id: i64 },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::NoUser => write!(f, "User not authenticated"),
            Denial::MissingRole => write!(f, "User has no role assigned"),
            Denial::BelowCitizenFloor { role_id } => {
                write!(f, "Role {role_id} cannot elaborate resolutions")
            }
            Denial::NoApprovalAccess { role_id } => {
                write!(f, "Role {role_id} cannot access procedure approvals")
            }
            Denial::State { reason, .. } => write!(f, "{reason}"),
            Denial::ReviewerStatusBlocked { status } => {
                write!(f, "Technical reviewers cannot elaborate on status {status}")
            }
            Denial::UnrecognizedRole { role_id } => {
                write!(f, "Role {role_id} has no resolution authority")
            }
        }
    }
}

/// Capacity under which a permitted user acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    TechnicalReviewer,
    Director,
    /// Legacy specialized department tier.
    Department,
}

/// Full result of one evaluation, before it is narrowed for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Evaluation {
    Granted {
        authority: Authority,
        state: ProcedureState,
    },
    Denied {
        #[serde(flatten)]
        denial: Denial,
    },
}

impl Evaluation {
    pub fn denied(denial: Denial) -> Self {
        Evaluation::Denied { denial }
    }

    pub fn permission(&self) -> ElaboratePermission {
        match self {
            Evaluation::Granted { authority, .. } => ElaboratePermission {
                can_elaborate: true,
                is_director: *authority == Authority::Director,
            },
            Evaluation::Denied { .. } => ElaboratePermission::DENIED,
        }
    }

    pub fn reason(&self) -> String {
        match self {
            Evaluation::Granted {
                authority: Authority::Director,
                state,
            } => format!("Director can elaborate resolution ({})", state.reason()),
            Evaluation::Granted {
                authority: Authority::TechnicalReviewer,
                state,
            } => format!(
                "Technical reviewer can elaborate resolution ({})",
                state.reason()
            ),
            Evaluation::Granted {
                authority: Authority::Department,
                state,
            } => format!("Department can elaborate resolution ({})", state.reason()),
            Evaluation::Denied { denial } => denial.to_string(),
        }
    }
}
