//! Four-step project wizard.
//!
//! # Responsibility
//! - Hold the answer aggregate and the step pointer.
//! - Mirror the aggregate to on-device storage on every change.
//! - Validate each step before advancing and upsert progress remotely.
//!
//! # Invariants
//! - A rejected step leaves aggregate and pointer untouched.
//! - On load, the remote record wins over the local copy.
//! - Remote failures never roll back local state.
//! - Without a signed-in user, remote writes are skipped.

use crate::config::PROJECT_DATA_KEY;
use crate::export::{export_project_pdf, ExportResult, ExportedDocument};
use crate::model::account::UserId;
use crate::model::notification::{NewNotification, NotificationKind};
use crate::model::project::{ProjectAnswers, ProjectDraft, ProjectRecord};
use crate::repo::backend_types::BackendResult;
use crate::repo::local_store::LocalStore;
use crate::repo::notification_repo::NotificationStore;
use crate::repo::project_repo::ProjectStore;
use crate::service::notice::Notice;
use crate::service::project_schema::{validate_step, StepInput, ValidationErrors, WizardStep};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MSG_PROJECT_SAVED: &str = "Projet enregistré avec succès !";
pub const MSG_PROJECT_SAVE_FAILED: &str = "Erreur lors de l'enregistrement du projet";
pub const MSG_PROJECT_LOAD_FAILED: &str = "Erreur lors du chargement du projet";
pub const MSG_PDF_EXPORTED: &str = "PDF téléchargé avec succès !";
pub const COMPLETION_NOTIFICATION_TITLE: &str = "Projet complété !";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Input submitted for a step other than the current one.
    StepMismatch {
        expected: WizardStep,
        actual: WizardStep,
    },
    Validation(ValidationErrors),
}

impl Display for WizardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepMismatch { expected, actual } => write!(
                f,
                "input for step {} submitted while on step {}",
                actual.number(),
                expected.number()
            ),
            Self::Validation(errors) => write!(f, "{errors}"),
        }
    }
}

impl Error for WizardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StepMismatch { .. } => None,
            Self::Validation(errors) => Some(errors),
        }
    }
}

impl From<ValidationErrors> for WizardError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// Result of an accepted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Step pointer after the call.
    pub step: WizardStep,
    pub completed: bool,
    /// Whether the remote upsert went through.
    pub synced: bool,
}

pub struct ProjectWizard<'a, L, B>
where
    L: LocalStore + ?Sized,
    B: ProjectStore + NotificationStore + ?Sized,
{
    local: &'a L,
    backend: &'a B,
    user_id: Option<UserId>,
    answers: ProjectAnswers,
    step: WizardStep,
    completed: bool,
    notices: Vec<Notice>,
}

impl<'a, L, B> ProjectWizard<'a, L, B>
where
    L: LocalStore + ?Sized,
    B: ProjectStore + NotificationStore + ?Sized,
{
    /// Empty wizard on step 1. Call `load` to restore saved progress.
    pub fn new(local: &'a L, backend: &'a B, user_id: Option<UserId>) -> Self {
        Self {
            local,
            backend,
            user_id,
            answers: ProjectAnswers::default(),
            step: WizardStep::PersonalInfo,
            completed: false,
            notices: Vec::new(),
        }
    }

    /// Restores the local copy, then the latest remote record if any.
    pub fn load(&mut self) {
        match self.local.get_item(PROJECT_DATA_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<ProjectAnswers>(&raw) {
                Ok(answers) => self.answers = answers,
                Err(err) => {
                    warn!("event=wizard_local_load module=service status=error error={err}")
                }
            },
            Ok(None) => {}
            Err(err) => warn!("event=wizard_local_load module=service status=error error={err}"),
        }

        let Some(user_id) = self.user_id else {
            return;
        };
        match self.backend.latest_project(user_id) {
            Ok(Some(record)) => self.adopt_remote(record),
            Ok(None) => debug!("event=wizard_remote_load module=service status=empty"),
            Err(err) => {
                error!(
                    "event=wizard_remote_load module=service status=error error_code={}",
                    err.code
                );
                self.notices.push(Notice::error(MSG_PROJECT_LOAD_FAILED));
            }
        }
    }

    fn adopt_remote(&mut self, record: ProjectRecord) {
        info!(
            "event=wizard_remote_load module=service status=ok project_id={} step={}",
            record.id, record.current_step
        );
        self.answers = record.answers;
        self.step = step_from_record(record.current_step);
        self.completed = record.completed;
        self.persist_local();
    }

    /// Mutates the aggregate in place and mirrors it locally.
    pub fn edit(&mut self, f: impl FnOnce(&mut ProjectAnswers)) {
        f(&mut self.answers);
        self.persist_local();
    }

    /// Validates and merges the current step's input, then moves on.
    ///
    /// # Errors
    /// - `StepMismatch` when `input` belongs to another step.
    /// - `Validation` with per-field messages; nothing is changed.
    pub fn advance(&mut self, input: StepInput) -> Result<AdvanceOutcome, WizardError> {
        if input.step() != self.step {
            return Err(WizardError::StepMismatch {
                expected: self.step,
                actual: input.step(),
            });
        }
        validate_step(&input)?;

        match input {
            StepInput::PersonalInfo(value) => self.answers.personal_info = value,
            StepInput::ProjectIdea(value) => self.answers.project_idea = value,
            StepInput::TargetMarket(value) => self.answers.target_market = value,
            StepInput::Resources(value) => self.answers.resources = value,
        }
        self.persist_local();

        if self.step.is_last() {
            self.completed = true;
            let synced = self.save_remote(self.step, true);
            if synced || self.user_id.is_none() {
                self.notices.push(Notice::success(MSG_PROJECT_SAVED));
            }
            return Ok(AdvanceOutcome {
                step: self.step,
                completed: true,
                synced,
            });
        }

        self.step = next_step(self.step);
        let synced = self.save_remote(self.step, false);
        Ok(AdvanceOutcome {
            step: self.step,
            completed: false,
            synced,
        })
    }

    /// Goes one step back; stays on step 1.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = WizardStep::from_number(self.step.number() - 1) {
            self.step = previous;
        }
        self.step
    }

    /// Moves the pointer to `step` when every earlier section validates.
    ///
    /// Used by stateless callers that keep the pointer themselves.
    ///
    /// # Errors
    /// - `Validation` for the first earlier section that fails; the pointer
    ///   is left unchanged.
    pub fn resume_at(&mut self, step: WizardStep) -> Result<WizardStep, WizardError> {
        for earlier in WizardStep::ALL.into_iter().filter(|earlier| *earlier < step) {
            validate_step(&StepInput::from_answers(earlier, &self.answers))?;
        }
        self.step = step;
        Ok(self.step)
    }

    /// Step pointer as a share of the four steps (25, 50, 75, 100).
    pub fn progress_percent(&self) -> u32 {
        u32::from(self.step.number()) * 100 / u32::from(WizardStep::COUNT)
    }

    pub fn can_export(&self) -> bool {
        self.answers.is_exportable()
    }

    /// Renders the project report dated `generated_on`.
    pub fn export_pdf(&mut self, generated_on: NaiveDate) -> ExportResult<ExportedDocument> {
        let document = export_project_pdf(&self.answers, generated_on)?;
        self.notices.push(Notice::success(MSG_PDF_EXPORTED));
        Ok(document)
    }

    pub fn answers(&self) -> &ProjectAnswers {
        &self.answers
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn persist_local(&self) {
        let encoded = match serde_json::to_string(&self.answers) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!("event=wizard_local_save module=service status=error error={err}");
                return;
            }
        };
        if let Err(err) = self.local.set_item(PROJECT_DATA_KEY, &encoded) {
            error!("event=wizard_local_save module=service status=error error={err}");
        }
    }

    /// Upserts the aggregate for the signed-in user; returns whether it landed.
    fn save_remote(&mut self, step: WizardStep, completed: bool) -> bool {
        let Some(user_id) = self.user_id else {
            debug!("event=wizard_remote_save module=service status=skipped reason=no_session");
            return false;
        };
        let draft = ProjectDraft {
            user_id,
            answers: self.answers.clone(),
            current_step: step.number(),
            completed,
        };

        match self.upsert(&draft) {
            Ok(record) => {
                info!(
                    "event=wizard_remote_save module=service status=ok project_id={} step={} completed={}",
                    record.id, record.current_step, record.completed
                );
                true
            }
            Err(err) => {
                error!(
                    "event=wizard_remote_save module=service status=error error_code={} error={}",
                    err.code, err
                );
                self.notices.push(Notice::error(MSG_PROJECT_SAVE_FAILED));
                false
            }
        }
    }

    fn upsert(&self, draft: &ProjectDraft) -> BackendResult<ProjectRecord> {
        // Check-then-write: two concurrent first saves can both insert.
        let record = match self.backend.find_project_id(draft.user_id)? {
            Some(id) => self.backend.update_project(id, draft)?,
            None => self.backend.insert_project(draft)?,
        };
        if draft.completed {
            self.backend.insert_notification(&NewNotification {
                user_id: draft.user_id,
                title: COMPLETION_NOTIFICATION_TITLE.to_string(),
                message: format!(
                    "Votre projet \"{}\" a été enregistré avec succès.",
                    draft.answers.project_idea.name
                ),
                kind: NotificationKind::Success,
            })?;
        }
        Ok(record)
    }
}

fn next_step(step: WizardStep) -> WizardStep {
    WizardStep::from_number(step.number() + 1).unwrap_or(WizardStep::Resources)
}

/// Out-of-range stored steps clamp into 1..=4; 0 means "not started".
fn step_from_record(current_step: u8) -> WizardStep {
    WizardStep::from_number(current_step.clamp(1, WizardStep::COUNT))
        .unwrap_or(WizardStep::PersonalInfo)
}

#[cfg(test)]
mod tests {
    use super::{next_step, step_from_record};
    use crate::service::project_schema::WizardStep;

    #[test]
    fn stored_step_clamps_into_range() {
        assert_eq!(step_from_record(0), WizardStep::PersonalInfo);
        assert_eq!(step_from_record(3), WizardStep::TargetMarket);
        assert_eq!(step_from_record(9), WizardStep::Resources);
    }

    #[test]
    fn next_step_saturates_on_last() {
        assert_eq!(next_step(WizardStep::PersonalInfo), WizardStep::ProjectIdea);
        assert_eq!(next_step(WizardStep::Resources), WizardStep::Resources);
    }
}
