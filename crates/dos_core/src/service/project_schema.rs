//! Per-step validation rules for the project wizard.
//!
//! # Invariants
//! - Lengths count Unicode scalar values; input is not trimmed.
//! - All failing fields of a step are reported, in declaration order.

use crate::model::project::{
    PersonalInfo, ProjectAnswers, ProjectIdea, ResourceNeeds, TargetMarket,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Wizard step, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    PersonalInfo,
    ProjectIdea,
    TargetMarket,
    Resources,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        Self::PersonalInfo,
        Self::ProjectIdea,
        Self::TargetMarket,
        Self::Resources,
    ];
    pub const COUNT: u8 = 4;

    pub fn number(self) -> u8 {
        match self {
            Self::PersonalInfo => 1,
            Self::ProjectIdea => 2,
            Self::TargetMarket => 3,
            Self::Resources => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PersonalInfo => "Informations personnelles",
            Self::ProjectIdea => "Idée de projet",
            Self::TargetMarket => "Marché cible",
            Self::Resources => "Ressources nécessaires",
        }
    }

    pub fn is_last(self) -> bool {
        self == Self::Resources
    }
}

/// Submitted values for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    PersonalInfo(PersonalInfo),
    ProjectIdea(ProjectIdea),
    TargetMarket(TargetMarket),
    Resources(ResourceNeeds),
}

impl StepInput {
    /// The section of `answers` that `step` edits.
    pub fn from_answers(step: WizardStep, answers: &ProjectAnswers) -> Self {
        match step {
            WizardStep::PersonalInfo => Self::PersonalInfo(answers.personal_info.clone()),
            WizardStep::ProjectIdea => Self::ProjectIdea(answers.project_idea.clone()),
            WizardStep::TargetMarket => Self::TargetMarket(answers.target_market.clone()),
            WizardStep::Resources => Self::Resources(answers.resources.clone()),
        }
    }

    pub fn step(&self) -> WizardStep {
        match self {
            Self::PersonalInfo(_) => WizardStep::PersonalInfo,
            Self::ProjectIdea(_) => WizardStep::ProjectIdea,
            Self::TargetMarket(_) => WizardStep::TargetMarket,
            Self::Resources(_) => WizardStep::Resources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// camelCase field name, as serialized.
    pub field: &'static str,
    pub message: &'static str,
}

/// Field-level validation failures for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    fn check(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.errors.push(FieldError { field, message });
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|error| error.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl Error for ValidationErrors {}

pub fn validate_step(input: &StepInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    match input {
        StepInput::PersonalInfo(info) => {
            errors.check(min_chars(&info.first_name, 2), "firstName", "Prénom requis");
            errors.check(min_chars(&info.last_name, 2), "lastName", "Nom requis");
            errors.check(EMAIL_RE.is_match(&info.email), "email", "Email invalide");
            errors.check(min_chars(&info.phone, 10), "phone", "Téléphone invalide");
        }
        StepInput::ProjectIdea(idea) => {
            errors.check(min_chars(&idea.name, 2), "name", "Nom du projet requis");
            errors.check(
                min_chars(&idea.description, 20),
                "description",
                "Description trop courte (min 20 caractères)",
            );
            errors.check(min_chars(&idea.sector, 1), "sector", "Secteur requis");
        }
        StepInput::TargetMarket(market) => {
            errors.check(
                min_chars(&market.target_clients, 10),
                "targetClients",
                "Décrivez vos clients cibles",
            );
            errors.check(
                min_chars(&market.competition, 10),
                "competition",
                "Décrivez la concurrence",
            );
            errors.check(
                min_chars(&market.positioning, 10),
                "positioning",
                "Décrivez votre positionnement",
            );
        }
        StepInput::Resources(_) => {}
    }
    errors.into_result()
}

fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

#[cfg(test)]
mod tests {
    use super::{validate_step, StepInput, WizardStep};
    use crate::model::project::{PersonalInfo, ProjectIdea, ResourceNeeds};

    #[test]
    fn personal_info_reports_every_failing_field() {
        let errors = validate_step(&StepInput::PersonalInfo(PersonalInfo {
            first_name: "A".to_string(),
            last_name: "Martin".to_string(),
            email: "not-an-email".to_string(),
            phone: "0612".to_string(),
        }))
        .unwrap_err();
        assert_eq!(errors.errors.len(), 3);
        assert_eq!(errors.get("firstName"), Some("Prénom requis"));
        assert_eq!(errors.get("email"), Some("Email invalide"));
        assert_eq!(errors.get("lastName"), None);
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let idea = ProjectIdea {
            name: "Éa".to_string(),
            description: "é".repeat(20),
            sector: "Tech".to_string(),
            innovation: String::new(),
        };
        assert!(validate_step(&StepInput::ProjectIdea(idea)).is_ok());
    }

    #[test]
    fn resources_are_optional() {
        assert!(validate_step(&StepInput::Resources(ResourceNeeds::default())).is_ok());
    }

    #[test]
    fn step_numbers_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_number(step.number()), Some(step));
        }
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(5), None);
        assert!(WizardStep::Resources.is_last());
    }
}
