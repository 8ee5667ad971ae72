use chrono::NaiveDate;
use dos_core::model::project::{
    PersonalInfo, ProjectAnswers, ProjectDraft, ProjectIdea, ResourceNeeds, TargetMarket,
};
use dos_core::service::project_schema::{StepInput, WizardStep};
use dos_core::service::project_wizard::{
    WizardError, COMPLETION_NOTIFICATION_TITLE, MSG_PDF_EXPORTED, MSG_PROJECT_SAVED,
};
use dos_core::{
    open_db_in_memory, ExportError, LocalStore, MemoryLocalStore, NotificationKind,
    NotificationStore, NoticeLevel, ProjectStore, ProjectWizard, SqliteBackend,
    PROJECT_DATA_KEY,
};
use uuid::Uuid;

#[test]
fn rejected_step_leaves_state_untouched() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let local = MemoryLocalStore::new();
    let mut wizard = ProjectWizard::new(&local, &backend, None);

    let err = wizard
        .advance(StepInput::PersonalInfo(PersonalInfo {
            first_name: "J".to_string(),
            ..personal_info()
        }))
        .unwrap_err();
    match err {
        WizardError::Validation(errors) => {
            assert_eq!(errors.errors.len(), 1);
            assert_eq!(errors.get("firstName"), Some("Prénom requis"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(wizard.current_step(), WizardStep::PersonalInfo);
    assert_eq!(wizard.answers(), &ProjectAnswers::default());
    assert_eq!(local.get_item(PROJECT_DATA_KEY).unwrap(), None);

    let mismatch = wizard
        .advance(StepInput::ProjectIdea(project_idea()))
        .unwrap_err();
    assert!(matches!(
        mismatch,
        WizardError::StepMismatch {
            expected: WizardStep::PersonalInfo,
            actual: WizardStep::ProjectIdea,
        }
    ));
}

#[test]
fn blocked_later_step_keeps_earlier_answers() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let local = MemoryLocalStore::new();
    let user = Uuid::new_v4();
    let mut wizard = ProjectWizard::new(&local, &backend, Some(user));
    wizard
        .advance(StepInput::PersonalInfo(personal_info()))
        .unwrap();
    let saved = wizard.answers().clone();
    let mirrored = local.get_item(PROJECT_DATA_KEY).unwrap();

    let err = wizard
        .advance(StepInput::ProjectIdea(ProjectIdea {
            name: String::new(),
            description: "trop court".to_string(),
            ..project_idea()
        }))
        .unwrap_err();
    match err {
        WizardError::Validation(errors) => {
            assert_eq!(errors.get("name"), Some("Nom du projet requis"));
            assert!(errors.get("description").is_some());
            assert_eq!(errors.get("sector"), None);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(wizard.current_step(), WizardStep::ProjectIdea);
    assert_eq!(wizard.answers(), &saved);
    assert_eq!(wizard.answers().personal_info, personal_info());
    assert_eq!(local.get_item(PROJECT_DATA_KEY).unwrap(), mirrored);
    let record = backend.latest_project(user).unwrap().unwrap();
    assert_eq!(record.current_step, 2);
    assert_eq!(record.answers.personal_info, personal_info());
    assert_eq!(record.answers.project_idea, ProjectIdea::default());
}

#[test]
fn resume_requires_valid_earlier_sections() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let local = MemoryLocalStore::new();
    let mut wizard = ProjectWizard::new(&local, &backend, None);
    wizard.edit(|answers| answers.personal_info = personal_info());

    let err = wizard.resume_at(WizardStep::TargetMarket).unwrap_err();
    match err {
        WizardError::Validation(errors) => assert!(errors.get("description").is_some()),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(wizard.current_step(), WizardStep::PersonalInfo);

    assert_eq!(
        wizard.resume_at(WizardStep::ProjectIdea).unwrap(),
        WizardStep::ProjectIdea
    );
    assert_eq!(wizard.progress_percent(), 50);
    assert_eq!(
        wizard.resume_at(WizardStep::PersonalInfo).unwrap(),
        WizardStep::PersonalInfo
    );
}

#[test]
fn anonymous_progress_is_mirrored_locally_only() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let local = MemoryLocalStore::new();

    let mut wizard = ProjectWizard::new(&local, &backend, None);
    let outcome = wizard
        .advance(StepInput::PersonalInfo(personal_info()))
        .unwrap();
    assert_eq!(outcome.step, WizardStep::ProjectIdea);
    assert!(!outcome.synced);
    assert_eq!(wizard.progress_percent(), 50);

    let raw = local.get_item(PROJECT_DATA_KEY).unwrap().unwrap();
    assert!(raw.contains("\"firstName\":\"Jeanne\""));

    // A fresh wizard restores answers but starts over on step 1.
    let mut restored = ProjectWizard::new(&local, &backend, None);
    restored.load();
    assert_eq!(restored.answers(), wizard.answers());
    assert_eq!(restored.answers().personal_info, personal_info());
    assert_eq!(restored.current_step(), WizardStep::PersonalInfo);
    assert!(restored.take_notices().is_empty());
}

#[test]
fn remote_record_wins_over_local_copy_on_load() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let local = MemoryLocalStore::new();
    let user = Uuid::new_v4();

    let mut stale = ProjectAnswers::default();
    stale.project_idea.name = "Ancien nom".to_string();
    local
        .set_item(PROJECT_DATA_KEY, &serde_json::to_string(&stale).unwrap())
        .unwrap();

    let mut remote = ProjectAnswers::default();
    remote.personal_info = personal_info();
    remote.project_idea = project_idea();
    backend
        .insert_project(&ProjectDraft {
            user_id: user,
            answers: remote.clone(),
            current_step: 3,
            completed: false,
        })
        .unwrap();

    let mut wizard = ProjectWizard::new(&local, &backend, Some(user));
    wizard.load();

    assert_eq!(wizard.answers(), &remote);
    assert_eq!(wizard.current_step(), WizardStep::TargetMarket);
    assert_eq!(wizard.progress_percent(), 75);
    let mirrored: ProjectAnswers =
        serde_json::from_str(&local.get_item(PROJECT_DATA_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(mirrored, remote);
}

#[test]
fn completing_all_steps_upserts_once_and_notifies() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let local = MemoryLocalStore::new();
    let user = Uuid::new_v4();
    let mut wizard = ProjectWizard::new(&local, &backend, Some(user));

    assert!(wizard.advance(StepInput::PersonalInfo(personal_info())).unwrap().synced);
    wizard.advance(StepInput::ProjectIdea(project_idea())).unwrap();
    wizard.advance(StepInput::TargetMarket(target_market())).unwrap();
    let outcome = wizard
        .advance(StepInput::Resources(ResourceNeeds::default()))
        .unwrap();

    assert!(outcome.completed);
    assert!(outcome.synced);
    assert_eq!(outcome.step, WizardStep::Resources);
    assert!(wizard.is_completed());
    assert_eq!(wizard.progress_percent(), 100);

    let record = backend.latest_project(user).unwrap().unwrap();
    assert!(record.completed);
    assert_eq!(record.current_step, 4);
    assert_eq!(record.answers.project_idea.name, "Atelier Vélo");

    let notifications = backend.list_notifications(user, 10).unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, COMPLETION_NOTIFICATION_TITLE);
    assert_eq!(notifications[0].kind, NotificationKind::Success);
    assert!(notifications[0].message.contains("Atelier Vélo"));

    let notices = wizard.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, MSG_PROJECT_SAVED);
}

#[test]
fn back_stops_on_first_step() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let local = MemoryLocalStore::new();
    let mut wizard = ProjectWizard::new(&local, &backend, None);

    wizard.advance(StepInput::PersonalInfo(personal_info())).unwrap();
    assert_eq!(wizard.back(), WizardStep::PersonalInfo);
    assert_eq!(wizard.back(), WizardStep::PersonalInfo);
    assert_eq!(wizard.progress_percent(), 25);
    // Answers survive navigation.
    assert_eq!(wizard.answers().personal_info, personal_info());
}

#[test]
fn export_requires_core_answers() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let local = MemoryLocalStore::new();
    let mut wizard = ProjectWizard::new(&local, &backend, None);
    let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

    assert!(!wizard.can_export());
    assert_eq!(wizard.export_pdf(date).unwrap_err(), ExportError::Incomplete);

    wizard.edit(|answers| {
        answers.personal_info = personal_info();
        answers.project_idea = project_idea();
        answers.target_market = target_market();
    });
    assert!(wizard.can_export());

    let document = wizard.export_pdf(date).unwrap();
    assert_eq!(document.file_name, "DOS_Projet_Atelier_Vélo_2024-05-02.pdf");
    assert!(document.bytes.starts_with(b"%PDF"));
    let notices = wizard.take_notices();
    assert_eq!(notices.last().unwrap().message, MSG_PDF_EXPORTED);
}

fn personal_info() -> PersonalInfo {
    PersonalInfo {
        first_name: "Jeanne".to_string(),
        last_name: "Martin".to_string(),
        email: "jeanne.martin@example.fr".to_string(),
        phone: "0612345678".to_string(),
    }
}

fn project_idea() -> ProjectIdea {
    ProjectIdea {
        name: "Atelier Vélo".to_string(),
        description: "Réparation et vente de vélos reconditionnés en centre-ville".to_string(),
        sector: "Commerce".to_string(),
        innovation: String::new(),
    }
}

fn target_market() -> TargetMarket {
    TargetMarket {
        target_clients: "Cyclistes urbains et étudiants".to_string(),
        competition: "Deux enseignes nationales en périphérie".to_string(),
        positioning: "Service rapide et prix accessibles".to_string(),
    }
}
