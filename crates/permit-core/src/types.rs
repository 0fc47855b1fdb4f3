use std::fmt;

use serde::{Deserialize, Serialize};

use crate::records::Procedure;

/// Workflow stage numbers as stored on a procedure.
pub mod status {
    pub const PENDING: i64 = 0;
    pub const PENDING_REVIEW: i64 = 1;
    pub const REJECTED: i64 = 2;
    pub const PREVENTION: i64 = 3;
    pub const DIRECTOR_APPROVED: i64 = 4;
    pub const LICENSE_ISSUED: i64 = 7;
}

/// Coarse workflow state re-derived from a procedure snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "status")]
pub enum ProcedureState {
    /// `director_approval == 1`; terminal.
    Locked,
    NotRouted,
    Rejected,
    DirectorApproved,
    Issued,
    PendingReview,
    Prevention,
    Pending,
    Unknown(i64),
}

impl ProcedureState {
    /// Classify a snapshot. The two flag gates are checked before any status
    /// branching; first match wins.
    pub fn of(procedure: &Procedure) -> Self {
        if procedure.director_approval == Some(1) {
            return Self::Locked;
        }
        if procedure.sent_to_reviewers != Some(1) {
            return Self::NotRouted;
        }
        match procedure.status {
            Some(status::REJECTED) => Self::Rejected,
            Some(status::DIRECTOR_APPROVED) => Self::DirectorApproved,
            Some(status::LICENSE_ISSUED) => Self::Issued,
            Some(status::PENDING_REVIEW) => Self::PendingReview,
            Some(status::PREVENTION) => Self::Prevention,
            None | Some(status::PENDING) => Self::Pending,
            Some(other) => Self::Unknown(other),
        }
    }

    pub fn is_elaborable(self) -> bool {
        matches!(self, Self::PendingReview | Self::Prevention | Self::Pending)
    }

    pub fn reason(self) -> String {
        match self {
            Self::Locked => "Procedure has already been approved by director".to_string(),
            Self::NotRouted => "Procedure has not been sent to reviewers".to_string(),
            Self::Rejected => "Procedure has been rejected".to_string(),
            Self::DirectorApproved => "Procedure has been approved by director".to_string(),
            Self::Issued => "License has been issued".to_string(),
            Self::PendingReview => "Procedure is in pending review state".to_string(),
            Self::Prevention => "Procedure is in prevention state".to_string(),
            Self::Pending => "Procedure is in pending state".to_string(),
            Self::Unknown(status) => format!("Unknown status: {status}"),
        }
    }
}

impl fmt::Display for ProcedureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::NotRouted => write!(f, "not_routed"),
            Self::Rejected => write!(f, "rejected"),
            Self::DirectorApproved => write!(f, "director_approved"),
            Self::Issued => write!(f, "issued"),
            Self::PendingReview => write!(f, "pending_review"),
            Self::Prevention => write!(f, "prevention"),
            Self::Pending => write!(f, "pending"),
            Self::Unknown(s) => write!(f, "unknown({s})"),
        }
    }
}

/// Role classification under the legacy numeric scheme.
///
/// Built only by [`crate::roles::RoleTable::classify`]; every "role above
/// tier N" rule lives there, the predicates below just read the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "class", content = "role_id")]
pub enum RoleClass {
    /// Zero or negative id.
    Unassigned,
    Citizen,
    Counter,
    Reviewer,
    Director,
    Admin,
    Technician,
    /// Department role created above the fixed tiers.
    CustomReviewer(i64),
}

impl RoleClass {
    pub fn is_technical_reviewer(self) -> bool {
        matches!(
            self,
            Self::Reviewer | Self::Technician | Self::CustomReviewer(_)
        )
    }

    /// Director authority. Includes the citizen id, which doubles as a legacy
    /// admin id; callers gate it out with the citizen floor first.
    pub fn is_director(self) -> bool {
        matches!(self, Self::Admin | Self::Director) || self.is_legacy_director()
    }

    pub fn is_legacy_director(self) -> bool {
        matches!(self, Self::Citizen)
    }

    pub fn can_access_procedure_approvals(self) -> bool {
        matches!(
            self,
            Self::Admin
                | Self::Director
                | Self::Reviewer
                | Self::Technician
                | Self::CustomReviewer(_)
        )
    }

    /// Legacy "specialized department" tier. Superseded by custom reviewer
    /// roles and never matches.
    pub fn is_specialized_department(self) -> bool {
        false
    }
}

impl fmt::Display for RoleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => write!(f, "unassigned"),
            Self::Citizen => write!(f, "citizen"),
            Self::Counter => write!(f, "counter"),
            Self::Reviewer => write!(f, "reviewer"),
            Self::Director => write!(f, "director"),
            Self::Admin => write!(f, "admin"),
            Self::Technician => write!(f, "technician"),
            Self::CustomReviewer(id) => write!(f, "custom_reviewer({id})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(status: Option<i64>, approval: Option<i64>, sent: Option<i64>) -> ProcedureState {
        ProcedureState::of(&Procedure::with_flags(status, approval, sent))
    }

    #[test]
    fn director_approval_gate_wins() {
        assert_eq!(state(Some(0), Some(1), Some(1)), ProcedureState::Locked);
        assert_eq!(state(Some(3), Some(1), None), ProcedureState::Locked);
    }

    #[test]
    fn routing_gate_precedes_status() {
        for sent in [None, Some(0), Some(2)] {
            assert_eq!(state(Some(1), None, sent), ProcedureState::NotRouted);
        }
    }

    #[test]
    fn status_mapping() {
        assert_eq!(state(None, None, Some(1)), ProcedureState::Pending);
        assert_eq!(state(Some(0), Some(0), Some(1)), ProcedureState::Pending);
        assert_eq!(state(Some(1), None, Some(1)), ProcedureState::PendingReview);
        assert_eq!(state(Some(2), None, Some(1)), ProcedureState::Rejected);
        assert_eq!(state(Some(3), None, Some(1)), ProcedureState::Prevention);
        assert_eq!(state(Some(4), None, Some(1)), ProcedureState::DirectorApproved);
        assert_eq!(state(Some(7), None, Some(1)), ProcedureState::Issued);
        assert_eq!(state(Some(8), None, Some(1)), ProcedureState::Unknown(8));
        assert_eq!(state(Some(9), None, Some(1)), ProcedureState::Unknown(9));
    }

    #[test]
    fn only_open_states_are_elaborable() {
        let open: Vec<_> = [
            ProcedureState::Locked,
            ProcedureState::NotRouted,
            ProcedureState::Rejected,
            ProcedureState::DirectorApproved,
            ProcedureState::Issued,
            ProcedureState::PendingReview,
            ProcedureState::Prevention,
            ProcedureState::Pending,
            ProcedureState::Unknown(8),
        ]
        .into_iter()
        .filter(|s| s.is_elaborable())
        .collect();
        assert_eq!(
            open,
            vec![
                ProcedureState::PendingReview,
                ProcedureState::Prevention,
                ProcedureState::Pending
            ]
        );
    }

    #[test]
    fn unknown_reason_names_status() {
        assert_eq!(ProcedureState::Unknown(8).reason(), "Unknown status: 8");
        assert!(ProcedureState::NotRouted
            .reason()
            .contains("not been sent to reviewers"));
    }

    #[test]
    fn citizen_is_legacy_director() {
        assert!(RoleClass::Citizen.is_director());
        assert!(!RoleClass::Citizen.can_access_procedure_approvals());
    }

    #[test]
    fn serde_tagging() {
        let json = serde_json::to_string(&RoleClass::CustomReviewer(9)).unwrap();
        assert_eq!(json, r#"{"class":"custom_reviewer","role_id":9}"#);
        let json = serde_json::to_string(&ProcedureState::Prevention).unwrap();
        assert_eq!(json, r#"{"state":"prevention"}"#);
    }
}
