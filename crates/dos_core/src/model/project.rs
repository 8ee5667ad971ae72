//! Project wizard aggregate.
//!
//! # Responsibility
//! - Define the four answer sections collected by the project wizard.
//! - Keep the JSON shape stable for local storage and the `projects` table.
//!
//! # Invariants
//! - Serialized names are camelCase (`personalInfo.firstName`, ...).
//! - Missing fields load as empty strings; unknown fields are dropped.

use crate::model::account::UserId;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable `projects` row identifier.
pub type ProjectId = Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectIdea {
    pub name: String,
    pub description: String,
    pub sector: String,
    pub innovation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetMarket {
    pub target_clients: String,
    pub competition: String,
    pub positioning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceNeeds {
    pub team: String,
    /// Older records stored this as a number.
    #[serde(deserialize_with = "string_or_number")]
    pub initial_budget: String,
    pub material_needs: String,
}

/// Accumulated wizard answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectAnswers {
    pub personal_info: PersonalInfo,
    pub project_idea: ProjectIdea,
    pub target_market: TargetMarket,
    pub resources: ResourceNeeds,
}

impl ProjectAnswers {
    /// Whether the answers carry enough to produce a project report.
    ///
    /// Requires first name, project name and target clients to be non-blank.
    pub fn is_exportable(&self) -> bool {
        !self.personal_info.first_name.trim().is_empty()
            && !self.project_idea.name.trim().is_empty()
            && !self.target_market.target_clients.trim().is_empty()
    }
}

/// Persisted wizard state for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub user_id: UserId,
    pub answers: ProjectAnswers,
    /// 1-based wizard step pointer.
    pub current_step: u8,
    pub completed: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Insert/update shape for `projects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub user_id: UserId,
    pub answers: ProjectAnswers,
    pub current_step: u8,
    pub completed: bool,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(value) => value,
        Raw::Number(value) => value.to_string(),
        Raw::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::ProjectAnswers;

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let answers: ProjectAnswers = serde_json::from_str(
            r#"{"personalInfo":{"firstName":"Alice"},"projectIdea":{"name":"Boulangerie"}}"#,
        )
        .unwrap();
        assert_eq!(answers.personal_info.first_name, "Alice");
        assert_eq!(answers.personal_info.email, "");
        assert_eq!(answers.project_idea.name, "Boulangerie");
        assert_eq!(answers.target_market.target_clients, "");
    }

    #[test]
    fn drops_unknown_fields_and_accepts_numeric_budget() {
        let answers: ProjectAnswers = serde_json::from_str(
            r#"{"resources":{"initialBudget":15000,"legacyField":"x"},"obsolete":true}"#,
        )
        .unwrap();
        assert_eq!(answers.resources.initial_budget, "15000");
    }

    #[test]
    fn serializes_camel_case_sections() {
        let json = serde_json::to_value(ProjectAnswers::default()).unwrap();
        assert!(json.get("personalInfo").is_some());
        assert!(json["targetMarket"].get("targetClients").is_some());
        assert!(json["resources"].get("materialNeeds").is_some());
    }

    #[test]
    fn exportable_requires_three_fields() {
        let mut answers = ProjectAnswers::default();
        assert!(!answers.is_exportable());
        answers.personal_info.first_name = "Alice".to_string();
        answers.project_idea.name = "Atelier".to_string();
        assert!(!answers.is_exportable());
        answers.target_market.target_clients = "Particuliers du quartier".to_string();
        assert!(answers.is_exportable());
    }
}
