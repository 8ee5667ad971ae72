//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate core results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Ids cross the boundary as hyphenated UUID strings.
//! - Every DB-backed call opens the database resolved once per process.

use chrono::Local;
use dos_core::advisor::charges::{parse_revenue, simulate};
use dos_core::advisor::quiz::rank_statuses;
use dos_core::db::open_db;
use dos_core::model::task::TaskPatch;
use dos_core::service::project_schema::{StepInput, WizardStep};
use dos_core::service::project_wizard::WizardError;
use dos_core::{
    core_version as core_version_inner, export_project_pdf, init_logging as init_logging_inner,
    ping as ping_inner, AuthBackend, Clock, CoreConfig, NotificationCenter, ProjectAnswers,
    ProjectWizard, Session, SqliteBackend, SqliteLocalStore, SystemClock, Task, TaskBoard,
    TaskStatus, TaskStore, UserId,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Session envelope returned by sign-up and sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub ok: bool,
    pub user_id: Option<String>,
    pub email: Option<String>,
    /// Backend error code on failure (`invalid_credentials`, `conflict`, ...).
    pub error_code: Option<String>,
    pub message: String,
}

impl AuthResponse {
    fn success(session: Session) -> Self {
        Self {
            ok: true,
            user_id: Some(session.user_id.to_string()),
            email: Some(session.email),
            error_code: None,
            message: "Signed in.".to_string(),
        }
    }

    fn failure(error_code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            user_id: None,
            email: None,
            error_code: error_code.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: String,
    pub task_key: String,
    pub title: String,
    pub category: String,
    /// `pending|in_progress|completed`.
    pub status: String,
    pub due_at_ms: Option<i64>,
    pub completed_at_ms: Option<i64>,
}

/// Task list plus dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub completed: u32,
    pub total: u32,
    pub completion_percent: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub notification_id: String,
    pub title: String,
    pub message: String,
    /// `success|warning|error|info`.
    pub kind: String,
    pub read: bool,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationListResponse {
    pub ok: bool,
    pub items: Vec<NotificationItem>,
    pub unread_count: u32,
    pub message: String,
}

/// Yearly figures of the charges simulator, in euros.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargesSimulation {
    pub social_charges: f64,
    pub income_tax: f64,
    pub net_before_tax: f64,
    pub net_after_tax: f64,
    pub monthly_net: f64,
    pub charges_rate_percent: f64,
    pub total_rate_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusScoreItem {
    pub status: String,
    pub score: u32,
    pub relative_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrorItem {
    /// camelCase field name of the submitted section.
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeItem {
    /// `success|error|info`.
    pub level: String,
    pub message: String,
}

/// Wizard state after a call.
///
/// `step`, `answers_json` and `notices` reflect the wizard even when
/// `ok` is false, so the form can stay on screen with its errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardResponse {
    pub ok: bool,
    /// 1..=4.
    pub step: u8,
    pub step_label: String,
    pub progress_percent: u32,
    pub completed: bool,
    /// Whether the remote upsert of this call went through.
    pub synced: bool,
    /// Aggregate in the camelCase shape stored on device.
    pub answers_json: String,
    pub field_errors: Vec<FieldErrorItem>,
    pub notices: Vec<NoticeItem>,
    pub message: String,
}

impl WizardResponse {
    fn failure(message: impl Into<String>) -> Self {
        let step = WizardStep::PersonalInfo;
        Self {
            ok: false,
            step: step.number(),
            step_label: step.label().to_string(),
            progress_percent: 0,
            completed: false,
            synced: false,
            answers_json: String::new(),
            field_errors: Vec::new(),
            notices: Vec::new(),
            message: message.into(),
        }
    }
}

/// Rendered project report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
    pub message: String,
}

/// Creates an account and returns its session.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures carry the backend error code.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_up(email: String, password: String, full_name: Option<String>) -> AuthResponse {
    let result = with_backend(|backend| {
        backend
            .sign_up(&email, &password, full_name.as_deref())
            .map_err(|err| (Some(err.code), err.to_string()))
    });
    match result {
        Ok(session) => AuthResponse::success(session),
        Err((code, message)) => AuthResponse::failure(code, message),
    }
}

/// Verifies credentials and returns a fresh session.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_in(email: String, password: String) -> AuthResponse {
    let result = with_backend(|backend| {
        backend
            .sign_in(&email, &password)
            .map_err(|err| (Some(err.code), err.to_string()))
    });
    match result {
        Ok(session) => AuthResponse::success(session),
        Err((code, message)) => AuthResponse::failure(code, message),
    }
}

/// Lists the user's tasks, seeding the default set on first use.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(user_id: String) -> TaskListResponse {
    let result = with_user(&user_id, |backend, user| {
        let clock = SystemClock;
        let mut board = TaskBoard::attach(backend, &clock, user);
        if let Some(notice) = board.take_notices().into_iter().next() {
            return Err((None, notice.message));
        }
        Ok((board.tasks().to_vec(), board.stats()))
    });
    match result {
        Ok((tasks, stats)) => TaskListResponse {
            ok: true,
            message: format!("Loaded {} task(s).", tasks.len()),
            items: tasks.into_iter().map(to_task_item).collect(),
            completed: to_u32(stats.completed),
            total: to_u32(stats.total),
            completion_percent: stats.completion_percent,
        },
        Err((_, message)) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            completed: 0,
            total: 0,
            completion_percent: 0,
            message,
        },
    }
}

/// Moves one task to `status` (`pending|in_progress|completed`).
///
/// # FFI contract
/// - Touches the single row only; never seeds the default task set.
/// - Tasks of other users are reported as not found.
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_status(user_id: String, task_id: String, status: String) -> ActionResponse {
    let Some(status) = TaskStatus::parse(status.trim()) else {
        return ActionResponse::failure(format!("unknown task status `{status}`"));
    };
    let task_id = match parse_id("task_id", &task_id) {
        Ok(id) => id,
        Err(message) => return ActionResponse::failure(message),
    };
    let result = with_user(&user_id, |backend, user| {
        let task = backend
            .get_task(task_id)
            .map_err(|err| (Some(err.code), err.to_string()))?;
        if task.user_id != user {
            return Err((None, format!("task not found: {task_id}")));
        }
        let patch = TaskPatch::for_status(status, SystemClock.now_ms());
        backend
            .update_task(task_id, &patch)
            .map_err(|err| (Some(err.code), err.to_string()))
    });
    match result {
        Ok(task) => ActionResponse::success(format!("Task is now {}.", task.status.as_str())),
        Err((_, message)) => ActionResponse::failure(message),
    }
}

/// Latest notifications of the user, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn notifications_list(user_id: String) -> NotificationListResponse {
    let result = with_user(&user_id, |backend, user| {
        let mut center = NotificationCenter::new(backend, user);
        center
            .refresh()
            .map_err(|err| (Some(err.code), err.to_string()))?;
        Ok((center.items().to_vec(), center.unread_count()))
    });
    match result {
        Ok((items, unread)) => NotificationListResponse {
            ok: true,
            message: format!("Loaded {} notification(s).", items.len()),
            items: items
                .into_iter()
                .map(|item| NotificationItem {
                    notification_id: item.id.to_string(),
                    title: item.title,
                    message: item.message,
                    kind: item.kind.as_str().to_string(),
                    read: item.read,
                    created_at_ms: item.created_at_ms,
                })
                .collect(),
            unread_count: to_u32(unread),
        },
        Err((_, message)) => NotificationListResponse {
            ok: false,
            items: Vec::new(),
            unread_count: 0,
            message,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn notifications_mark_all_read(user_id: String) -> ActionResponse {
    let result = with_user(&user_id, |backend, user| {
        NotificationCenter::new(backend, user)
            .mark_all_read()
            .map_err(|err| (Some(err.code), err.to_string()))
    });
    match result {
        Ok(()) => ActionResponse::success("All notifications marked read."),
        Err((_, message)) => ActionResponse::failure(message),
    }
}

/// Runs the social charges simulator on the raw form input.
///
/// Returns `None` for an unknown status key.
#[flutter_rust_bridge::frb(sync)]
pub fn simulate_charges(revenue: String, status_key: String) -> Option<ChargesSimulation> {
    let simulation = simulate(parse_revenue(&revenue), status_key.trim())?;
    Some(ChargesSimulation {
        social_charges: simulation.social_charges,
        income_tax: simulation.income_tax,
        net_before_tax: simulation.net_before_tax,
        net_after_tax: simulation.net_after_tax,
        monthly_net: simulation.monthly_net(),
        charges_rate_percent: simulation.charges_rate_percent,
        total_rate_percent: simulation.total_rate_percent,
    })
}

/// Ranks legal statuses from quiz answers (option index per question).
#[flutter_rust_bridge::frb(sync)]
pub fn quiz_rank(answers: Vec<Option<u32>>) -> Vec<StatusScoreItem> {
    let answers: Vec<Option<usize>> = answers
        .into_iter()
        .map(|answer| answer.and_then(|index| usize::try_from(index).ok()))
        .collect();
    rank_statuses(&answers)
        .into_iter()
        .map(|score| StatusScoreItem {
            status: score.status.to_string(),
            score: score.score,
            relative_percent: score.relative_percent,
        })
        .collect()
}

/// Restores wizard progress: local copy first, then the user's saved project.
///
/// # FFI contract
/// - `user_id` is `None` for anonymous use; progress then stays on device.
/// - Sync call, DB-backed execution. Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn project_wizard_load(user_id: Option<String>) -> WizardResponse {
    let result = with_wizard(user_id.as_deref(), |wizard| {
        Ok(wizard_snapshot(wizard, true, false, Vec::new(), "Project loaded."))
    });
    result.unwrap_or_else(|(_, message)| WizardResponse::failure(message))
}

/// Validates `input_json` for `step` and moves the wizard forward.
///
/// # FFI contract
/// - `step` is the step shown on screen; every earlier section must
///   already be valid.
/// - `input_json` is the camelCase section of that step.
/// - Rejected input leaves the saved progress untouched and lists the
///   failing fields.
#[flutter_rust_bridge::frb(sync)]
pub fn project_wizard_advance(
    user_id: Option<String>,
    step: u8,
    input_json: String,
) -> WizardResponse {
    let Some(step) = WizardStep::from_number(step) else {
        return WizardResponse::failure(format!("unknown wizard step `{step}`"));
    };
    let result = with_wizard(user_id.as_deref(), |wizard| {
        if let Err(err) = wizard.resume_at(step) {
            return Ok(wizard_rejected(wizard, err));
        }
        let input = match parse_step_input(step, &input_json) {
            Ok(input) => input,
            Err(err) => {
                let message = format!("invalid step input: {err}");
                return Ok(wizard_snapshot(wizard, false, false, Vec::new(), message));
            }
        };
        Ok(match wizard.advance(input) {
            Ok(outcome) => {
                let message = if outcome.completed {
                    "Project completed."
                } else {
                    "Step saved."
                };
                wizard_snapshot(wizard, true, outcome.synced, Vec::new(), message)
            }
            Err(err) => wizard_rejected(wizard, err),
        })
    });
    result.unwrap_or_else(|(_, message)| WizardResponse::failure(message))
}

/// Goes one step back from `step`; stays on step 1.
#[flutter_rust_bridge::frb(sync)]
pub fn project_wizard_back(user_id: Option<String>, step: u8) -> WizardResponse {
    let Some(step) = WizardStep::from_number(step) else {
        return WizardResponse::failure(format!("unknown wizard step `{step}`"));
    };
    let result = with_wizard(user_id.as_deref(), |wizard| {
        if let Err(err) = wizard.resume_at(step) {
            return Ok(wizard_rejected(wizard, err));
        }
        wizard.back();
        Ok(wizard_snapshot(wizard, true, false, Vec::new(), "Moved back."))
    });
    result.unwrap_or_else(|(_, message)| WizardResponse::failure(message))
}

type FfiWizard<'a> = ProjectWizard<'a, SqliteLocalStore<'a>, SqliteBackend<'a>>;

fn with_wizard<T>(
    user_id: Option<&str>,
    f: impl FnOnce(&mut FfiWizard<'_>) -> Result<T, CallError>,
) -> Result<T, CallError> {
    let user = user_id
        .map(|value| parse_id("user_id", value))
        .transpose()
        .map_err(|message| (None, message))?;
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| (None, format!("DB open failed: {err}")))?;
    let backend =
        SqliteBackend::try_new(&conn).map_err(|err| (None, format!("backend init failed: {err}")))?;
    let local = SqliteLocalStore::try_new(&conn)
        .map_err(|err| (None, format!("local store init failed: {err}")))?;

    let mut wizard = ProjectWizard::new(&local, &backend, user);
    wizard.load();
    f(&mut wizard)
}

fn parse_step_input(step: WizardStep, input_json: &str) -> serde_json::Result<StepInput> {
    Ok(match step {
        WizardStep::PersonalInfo => StepInput::PersonalInfo(serde_json::from_str(input_json)?),
        WizardStep::ProjectIdea => StepInput::ProjectIdea(serde_json::from_str(input_json)?),
        WizardStep::TargetMarket => StepInput::TargetMarket(serde_json::from_str(input_json)?),
        WizardStep::Resources => StepInput::Resources(serde_json::from_str(input_json)?),
    })
}

fn wizard_rejected(wizard: &mut FfiWizard<'_>, err: WizardError) -> WizardResponse {
    let field_errors = match &err {
        WizardError::Validation(errors) => errors
            .errors
            .iter()
            .map(|error| FieldErrorItem {
                field: error.field.to_string(),
                message: error.message.to_string(),
            })
            .collect(),
        WizardError::StepMismatch { .. } => Vec::new(),
    };
    wizard_snapshot(wizard, false, false, field_errors, err.to_string())
}

fn wizard_snapshot(
    wizard: &mut FfiWizard<'_>,
    ok: bool,
    synced: bool,
    field_errors: Vec<FieldErrorItem>,
    message: impl Into<String>,
) -> WizardResponse {
    let step = wizard.current_step();
    let answers_json = serde_json::to_string(wizard.answers()).unwrap_or_else(|err| {
        warn!("event=ffi_wizard_encode module=ffi status=error error={err}");
        String::new()
    });
    WizardResponse {
        ok,
        step: step.number(),
        step_label: step.label().to_string(),
        progress_percent: wizard.progress_percent(),
        completed: wizard.is_completed(),
        synced,
        answers_json,
        field_errors,
        notices: wizard
            .take_notices()
            .into_iter()
            .map(|notice| NoticeItem {
                level: notice.level.as_str().to_string(),
                message: notice.message,
            })
            .collect(),
        message: message.into(),
    }
}

/// Renders the project report from the wizard aggregate JSON.
///
/// # FFI contract
/// - `answers_json` uses the camelCase shape stored on device.
/// - The report is dated with the local calendar day.
/// - Never panics; `bytes` is empty on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn project_export_pdf(answers_json: String) -> ExportResponse {
    let answers = match serde_json::from_str::<ProjectAnswers>(&answers_json) {
        Ok(answers) => answers,
        Err(err) => return export_failure(format!("invalid project answers: {err}")),
    };
    match export_project_pdf(&answers, Local::now().date_naive()) {
        Ok(document) => ExportResponse {
            ok: true,
            file_name: Some(document.file_name),
            bytes: document.bytes,
            message: "PDF generated.".to_string(),
        },
        Err(err) => export_failure(err.to_string()),
    }
}

fn export_failure(message: String) -> ExportResponse {
    ExportResponse {
        ok: false,
        file_name: None,
        bytes: Vec::new(),
        message,
    }
}

type CallError = (Option<&'static str>, String);

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| match CoreConfig::from_env() {
            Ok(config) => config.db_path,
            Err(err) => {
                warn!("event=ffi_config module=ffi status=error error={err}");
                std::env::temp_dir().join(dos_core::config::DEFAULT_DB_FILE_NAME)
            }
        })
        .clone()
}

fn with_backend<T>(
    f: impl FnOnce(&SqliteBackend<'_>) -> Result<T, CallError>,
) -> Result<T, CallError> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| (None, format!("DB open failed: {err}")))?;
    let backend =
        SqliteBackend::try_new(&conn).map_err(|err| (None, format!("backend init failed: {err}")))?;
    f(&backend)
}

fn with_user<T>(
    user_id: &str,
    f: impl FnOnce(&SqliteBackend<'_>, UserId) -> Result<T, CallError>,
) -> Result<T, CallError> {
    let user = parse_id("user_id", user_id).map_err(|message| (None, message))?;
    with_backend(|backend| f(backend, user))
}

fn parse_id(field: &str, value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid {field}: `{value}`"))
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        task_id: task.id.to_string(),
        task_key: task.task_key,
        title: task.title,
        category: task.category,
        status: task.status.as_str().to_string(),
        due_at_ms: task.due_at_ms,
        completed_at_ms: task.completed_at_ms,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        auth_sign_in, auth_sign_up, core_version, init_logging, notifications_list,
        notifications_mark_all_read, ping, project_export_pdf, project_wizard_advance,
        project_wizard_back, project_wizard_load, quiz_rank, simulate_charges, task_set_status,
        tasks_list,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn sign_up_then_sign_in_returns_same_user() {
        let email = unique_email("auth");
        let created = auth_sign_up(email.clone(), "secret-123".to_string(), None);
        assert!(created.ok, "{}", created.message);

        let signed_in = auth_sign_in(email.clone(), "secret-123".to_string());
        assert!(signed_in.ok, "{}", signed_in.message);
        assert_eq!(signed_in.user_id, created.user_id);

        let wrong = auth_sign_in(email, "wrong-pass".to_string());
        assert!(!wrong.ok);
        assert_eq!(wrong.error_code.as_deref(), Some("invalid_credentials"));
    }

    #[test]
    fn tasks_are_seeded_and_updatable() {
        let user_id = signed_up_user("tasks");

        let listed = tasks_list(user_id.clone());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.total, 8);
        assert_eq!(listed.completed, 0);

        let task_id = listed.items[0].task_id.clone();
        let updated = task_set_status(user_id.clone(), task_id, "completed".to_string());
        assert!(updated.ok, "{}", updated.message);

        let relisted = tasks_list(user_id.clone());
        assert_eq!(relisted.total, 8);
        assert_eq!(relisted.completed, 1);
        assert_eq!(relisted.completion_percent, 13);

        let bad = task_set_status(user_id, "nope".to_string(), "completed".to_string());
        assert!(!bad.ok);
    }

    #[test]
    fn task_status_is_scoped_to_the_owner() {
        let owner = signed_up_user("owner");
        let task_id = tasks_list(owner.clone()).items[0].task_id.clone();

        let stranger = signed_up_user("stranger");
        let denied = task_set_status(stranger, task_id.clone(), "completed".to_string());
        assert!(!denied.ok);
        assert!(denied.message.contains("not found"));

        let listed = tasks_list(owner.clone());
        assert_eq!(listed.completed, 0);

        let started = task_set_status(owner, task_id, "in_progress".to_string());
        assert!(started.ok, "{}", started.message);
        assert_eq!(started.message, "Task is now in_progress.");
    }

    #[test]
    fn wizard_steps_are_validated_saved_and_restored() {
        let user_id = signed_up_user("wizard");

        let loaded = project_wizard_load(Some(user_id.clone()));
        assert!(loaded.ok, "{}", loaded.message);
        assert_eq!(loaded.step, 1);
        assert_eq!(loaded.progress_percent, 25);

        let rejected = project_wizard_advance(
            Some(user_id.clone()),
            1,
            r#"{"firstName":"J","lastName":"Martin","email":"jeanne@example.fr","phone":"0601020304"}"#
                .to_string(),
        );
        assert!(!rejected.ok);
        assert_eq!(rejected.step, 1);
        assert_eq!(rejected.field_errors.len(), 1);
        assert_eq!(rejected.field_errors[0].field, "firstName");

        let accepted = project_wizard_advance(
            Some(user_id.clone()),
            1,
            r#"{"firstName":"Jeanne","lastName":"Martin","email":"jeanne@example.fr","phone":"0601020304"}"#
                .to_string(),
        );
        assert!(accepted.ok, "{}", accepted.message);
        assert!(accepted.synced);
        assert_eq!(accepted.step, 2);
        assert_eq!(accepted.progress_percent, 50);

        // Saved progress wins on the next load.
        let reloaded = project_wizard_load(Some(user_id.clone()));
        assert_eq!(reloaded.step, 2);
        assert!(reloaded.answers_json.contains("\"firstName\":\"Jeanne\""));

        let short = project_wizard_advance(
            Some(user_id.clone()),
            2,
            r#"{"name":"Atelier","description":"trop court","sector":"Artisanat"}"#.to_string(),
        );
        assert!(!short.ok);
        assert_eq!(short.step, 2);
        assert_eq!(short.field_errors[0].field, "description");
        assert!(short.answers_json.contains("\"firstName\":\"Jeanne\""));

        let back = project_wizard_back(Some(user_id.clone()), 2);
        assert!(back.ok, "{}", back.message);
        assert_eq!(back.step, 1);

        assert!(!project_wizard_advance(Some(user_id.clone()), 9, "{}".to_string()).ok);
        assert!(!project_wizard_advance(Some(user_id), 2, "not json".to_string()).ok);
        assert!(!project_wizard_load(Some("not-a-uuid".to_string())).ok);
    }

    #[test]
    fn notifications_start_empty_for_new_users() {
        let user_id = signed_up_user("notifications");
        let listed = notifications_list(user_id.clone());
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.is_empty());
        assert!(notifications_mark_all_read(user_id).ok);

        assert!(!notifications_list("not-a-uuid".to_string()).ok);
    }

    #[test]
    fn calculators_cross_the_boundary() {
        let simulation = simulate_charges("30000".to_string(), "sasu".to_string()).unwrap();
        assert!(simulation.net_after_tax < 30_000.0);
        assert!(simulate_charges("1000".to_string(), "unknown".to_string()).is_none());

        let ranking = quiz_rank(vec![Some(0); 7]);
        assert_eq!(ranking[0].status, "Auto-entrepreneur");
        assert_eq!(ranking[0].relative_percent, 100);
    }

    #[test]
    fn export_reports_invalid_and_incomplete_input() {
        assert!(!project_export_pdf("not json".to_string()).ok);

        let incomplete = project_export_pdf("{}".to_string());
        assert!(!incomplete.ok);
        assert!(incomplete.bytes.is_empty());

        let complete = project_export_pdf(
            r#"{"personalInfo":{"firstName":"Jeanne"},
                "projectIdea":{"name":"Atelier"},
                "targetMarket":{"targetClients":"Cyclistes urbains"}}"#
                .to_string(),
        );
        assert!(complete.ok, "{}", complete.message);
        assert!(complete.file_name.unwrap().starts_with("DOS_Projet_Atelier_"));
        assert!(complete.bytes.starts_with(b"%PDF"));
    }

    fn signed_up_user(prefix: &str) -> String {
        let response = auth_sign_up(unique_email(prefix), "secret-123".to_string(), None);
        assert!(response.ok, "{}", response.message);
        response.user_id.expect("sign-up should return user_id")
    }

    fn unique_email(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}@example.fr")
    }
}
