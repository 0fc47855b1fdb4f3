use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::RoleTableError;
use crate::types::RoleClass;

/// Legacy role numbering.
pub mod legacy {
    pub const CITIZEN: i64 = 1;
    pub const COUNTER: i64 = 2;
    pub const REVIEWER: i64 = 3;
    pub const DIRECTOR: i64 = 4;
    pub const ADMIN: i64 = 5;
    pub const TECHNICIAN: i64 = 6;
}

/// Role-id tables and thresholds used to classify users.
///
/// The default is the legacy mapping. A JSON file may override any subset
/// of keys; the rest keep their legacy values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleTable {
    pub admin_ids: BTreeSet<i64>,
    pub director_ids: BTreeSet<i64>,
    pub reviewer_ids: BTreeSet<i64>,
    pub technician_ids: BTreeSet<i64>,
    /// Ids at or below this never elaborate.
    pub citizen_floor: i64,
    /// Ids above this are reviewer-class unless listed as admin.
    pub director_threshold: i64,
    /// Ids above this are never directors.
    pub technician_threshold: i64,
    pub names: BTreeMap<i64, String>,
}

impl Default for RoleTable {
    fn default() -> Self {
        use legacy::*;
        Self {
            admin_ids: BTreeSet::from([ADMIN]),
            director_ids: BTreeSet::from([DIRECTOR]),
            reviewer_ids: BTreeSet::from([REVIEWER]),
            technician_ids: BTreeSet::from([TECHNICIAN]),
            citizen_floor: CITIZEN,
            director_threshold: DIRECTOR,
            technician_threshold: TECHNICIAN,
            names: BTreeMap::from([
                (CITIZEN, "citizen".to_string()),
                (COUNTER, "counter".to_string()),
                (REVIEWER, "reviewer".to_string()),
                (DIRECTOR, "director".to_string()),
                (ADMIN, "admin".to_string()),
                (TECHNICIAN, "technician".to_string()),
            ]),
        }
    }
}

impl RoleTable {
    /// Map a role id to its class. Guards are ordered; first match wins:
    ///
    /// 1. non-positive → unassigned
    /// 2. admin set → admin
    /// 3. reviewer set → reviewer (wins over a director listing)
    /// 4. director set, at or below the technician threshold → director
    /// 5. technician set → technician
    /// 6. at or below the citizen floor → citizen
    /// 7. above the director threshold → custom reviewer
    /// 8. anything left is a counter-tier role
    pub fn classify(&self, role_id: i64) -> RoleClass {
        if role_id <= 0 {
            return RoleClass::Unassigned;
        }
        if self.admin_ids.contains(&role_id) {
            return RoleClass::Admin;
        }
        if self.reviewer_ids.contains(&role_id) {
            return RoleClass::Reviewer;
        }
        if self.director_ids.contains(&role_id) && role_id <= self.technician_threshold {
            return RoleClass::Director;
        }
        if self.technician_ids.contains(&role_id) {
            return RoleClass::Technician;
        }
        if role_id <= self.citizen_floor {
            return RoleClass::Citizen;
        }
        if role_id > self.director_threshold {
            return RoleClass::CustomReviewer(role_id);
        }
        RoleClass::Counter
    }

    /// Human label for a role id, for diagnostics.
    pub fn label(&self, role_id: i64) -> String {
        self.names
            .get(&role_id)
            .cloned()
            .unwrap_or_else(|| self.classify(role_id).to_string())
    }

    pub fn validate(&self) -> Result<(), RoleTableError> {
        if self.citizen_floor >= self.director_threshold {
            return Err(RoleTableError::FloorAboveDirector {
                floor: self.citizen_floor,
                director: self.director_threshold,
            });
        }
        if self.director_threshold > self.technician_threshold {
            return Err(RoleTableError::DirectorAboveTechnician {
                director: self.director_threshold,
                technician: self.technician_threshold,
            });
        }
        let listed = self
            .admin_ids
            .iter()
            .chain(&self.director_ids)
            .chain(&self.reviewer_ids)
            .chain(&self.technician_ids);
        if let Some(bad) = listed.copied().find(|id| *id <= 0) {
            return Err(RoleTableError::NonPositiveId(bad));
        }
        if let Some(id) = self.admin_ids.intersection(&self.reviewer_ids).next() {
            return Err(RoleTableError::AdminReviewerOverlap(*id));
        }
        Ok(())
    }
}

/// Classify under the legacy table.
pub fn classify_role(role_id: i64) -> RoleClass {
    RoleTable::default().classify(role_id)
}

/// Load and validate a role table from a JSON file.
pub fn load_role_table(path: &str) -> Result<RoleTable> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read role table {path}"))?;
    let table: RoleTable =
        serde_json::from_str(&content).with_context(|| format!("{path}: invalid role table JSON"))?;
    table
        .validate()
        .with_context(|| format!("{path}: inconsistent role table"))?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_boundaries() {
        assert_eq!(classify_role(-3), RoleClass::Unassigned);
        assert_eq!(classify_role(0), RoleClass::Unassigned);
        assert_eq!(classify_role(1), RoleClass::Citizen);
        assert_eq!(classify_role(2), RoleClass::Counter);
        assert_eq!(classify_role(3), RoleClass::Reviewer);
        assert_eq!(classify_role(4), RoleClass::Director);
        assert_eq!(classify_role(5), RoleClass::Admin);
        assert_eq!(classify_role(6), RoleClass::Technician);
        assert_eq!(classify_role(7), RoleClass::CustomReviewer(7));
        assert_eq!(classify_role(9), RoleClass::CustomReviewer(9));
        assert_eq!(classify_role(999), RoleClass::CustomReviewer(999));
    }

    #[test]
    fn predicates_at_boundaries() {
        let reviewer = |id| classify_role(id).is_technical_reviewer();
        let director = |id| classify_role(id).is_director();
        let access = |id| classify_role(id).can_access_procedure_approvals();

        assert!(!reviewer(1) && director(1) && !access(1));
        assert!(!reviewer(2) && !director(2) && !access(2));
        assert!(reviewer(3) && !director(3) && access(3));
        assert!(!reviewer(4) && director(4) && access(4));
        // Admin ids are carved out of the "above director" reviewer rule.
        assert!(!reviewer(5) && director(5) && access(5));
        assert!(reviewer(6) && !director(6) && access(6));
        for id in [7, 9, 999] {
            assert!(reviewer(id) && !director(id) && access(id), "role {id}");
        }
    }

    #[test]
    fn director_set_respects_technician_threshold() {
        let table = RoleTable {
            director_ids: BTreeSet::from([4, 8]),
            ..RoleTable::default()
        };
        assert_eq!(table.classify(8), RoleClass::CustomReviewer(8));
    }

    #[test]
    fn reviewer_listing_beats_director_listing() {
        let table = RoleTable {
            reviewer_ids: BTreeSet::from([3, 4]),
            ..RoleTable::default()
        };
        assert_eq!(table.validate(), Ok(()));
        let class = table.classify(4);
        assert_eq!(class, RoleClass::Reviewer);
        assert!(class.is_technical_reviewer());
    }

    #[test]
    fn configured_admin_above_threshold() {
        let table = RoleTable {
            admin_ids: BTreeSet::from([5, 12]),
            ..RoleTable::default()
        };
        assert_eq!(table.classify(12), RoleClass::Admin);
        assert!(table.classify(12).is_director());
    }

    #[test]
    fn labels_fall_back_to_class() {
        let table = RoleTable::default();
        assert_eq!(table.label(4), "director");
        assert_eq!(table.label(42), "custom_reviewer(42)");
    }

    #[test]
    fn default_table_is_valid() {
        assert_eq!(RoleTable::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_thresholds() {
        let table = RoleTable {
            citizen_floor: 4,
            ..RoleTable::default()
        };
        assert!(matches!(
            table.validate(),
            Err(RoleTableError::FloorAboveDirector { .. })
        ));
        let table = RoleTable {
            director_threshold: 7,
            ..RoleTable::default()
        };
        assert!(matches!(
            table.validate(),
            Err(RoleTableError::DirectorAboveTechnician { .. })
        ));
    }

    #[test]
    fn validate_rejects_overlap_and_zero() {
        let table = RoleTable {
            reviewer_ids: BTreeSet::from([3, 5]),
            ..RoleTable::default()
        };
        assert_eq!(table.validate(), Err(RoleTableError::AdminReviewerOverlap(5)));
        let table = RoleTable {
            technician_ids: BTreeSet::from([0, 6]),
            ..RoleTable::default()
        };
        assert_eq!(table.validate(), Err(RoleTableError::NonPositiveId(0)));
    }

    #[test]
    fn load_partial_table_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.json");
        std::fs::write(&path, r#"{"admin_ids": [5, 20]}"#).unwrap();
        let table = load_role_table(path.to_str().unwrap()).unwrap();
        assert_eq!(table.admin_ids, BTreeSet::from([5, 20]));
        assert_eq!(table.director_threshold, legacy::DIRECTOR);
        assert_eq!(table.classify(20), RoleClass::Admin);
    }

    #[test]
    fn load_rejects_inconsistent_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.json");
        std::fs::write(&path, r#"{"citizen_floor": 9}"#).unwrap();
        let err = load_role_table(path.to_str().unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains("inconsistent role table"));
    }
}
