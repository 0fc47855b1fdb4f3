use serde::{Deserialize, Serialize};

/// Snapshot of a permitting procedure, as fetched by the caller.
///
/// Every field is optional: a JSON `null` and a missing key are both `None`,
/// and the decision logic treats `None` as failing any equality check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality_id: Option<i64>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub director_approval: Option<i64>,
    #[serde(default)]
    pub sent_to_reviewers: Option<i64>,
}

impl Procedure {
    /// Procedure with only the three gating fields set.
    pub fn with_flags(
        status: Option<i64>,
        director_approval: Option<i64>,
        sent_to_reviewers: Option<i64>,
    ) -> Self {
        Self {
            status,
            director_approval,
            sent_to_reviewers,
            ..Self::default()
        }
    }

    /// Caller-facing label: folio if present, else id.
    pub fn label(&self) -> String {
        match (&self.folio, self.id) {
            (Some(folio), _) => folio.clone(),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => "(unidentified)".to_string(),
        }
    }
}

/// Acting user. `role_name` is diagnostic only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
}

impl User {
    pub fn with_role(role_id: i64) -> Self {
        Self {
            role_id: Some(role_id),
            role_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_fields_are_none() {
        let p: Procedure =
            serde_json::from_str(r#"{"status": null, "sent_to_reviewers": 1}"#).unwrap();
        assert_eq!(p.status, None);
        assert_eq!(p.director_approval, None);
        assert_eq!(p.sent_to_reviewers, Some(1));
    }

    #[test]
    fn identity_fields_are_carried() {
        let p: Procedure = serde_json::from_str(
            r#"{"id": 12, "folio": "LIC-2024-001", "municipality_id": 3, "status": 1}"#,
        )
        .unwrap();
        assert_eq!(p.label(), "LIC-2024-001");
        assert_eq!(p.municipality_id, Some(3));
        assert_eq!(Procedure::default().label(), "(unidentified)");
    }

    #[test]
    fn user_without_role() {
        let u: User = serde_json::from_str(r#"{"role_name": "ghost"}"#).unwrap();
        assert_eq!(u.role_id, None);
        assert_eq!(u.role_name.as_deref(), Some("ghost"));
    }
}
