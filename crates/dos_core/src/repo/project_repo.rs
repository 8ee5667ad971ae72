//! Project store contract and SQLite implementation.
//!
//! # Invariants
//! - `project_data` holds the camelCase JSON of `ProjectAnswers`.
//! - "Latest" means greatest `updated_at`, ties by most recent insertion.

use crate::model::account::UserId;
use crate::model::project::{ProjectAnswers, ProjectDraft, ProjectId, ProjectRecord};
use crate::repo::backend_types::{
    BackendError, BackendResult, BackendStage, StorageContext, Table,
};
use crate::repo::sqlite_backend::{bool_to_int, parse_flag, parse_uuid, SqliteBackend};
use crate::sync::change_feed::{ChangeKind, ChangeRow};
use log::info;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    project_data,
    current_step,
    completed,
    created_at,
    updated_at
FROM projects";

/// Remote wizard records.
pub trait ProjectStore {
    fn latest_project(&self, user_id: UserId) -> BackendResult<Option<ProjectRecord>>;
    /// Id of any existing record for `user_id`, used by the upsert check.
    fn find_project_id(&self, user_id: UserId) -> BackendResult<Option<ProjectId>>;
    fn insert_project(&self, draft: &ProjectDraft) -> BackendResult<ProjectRecord>;
    fn update_project(&self, id: ProjectId, draft: &ProjectDraft) -> BackendResult<ProjectRecord>;
}

impl ProjectStore for SqliteBackend<'_> {
    fn latest_project(&self, user_id: UserId) -> BackendResult<Option<ProjectRecord>> {
        let row = self
            .conn()
            .query_row(
                &format!(
                    "{PROJECT_SELECT_SQL}
                     WHERE user_id = ?1
                     ORDER BY updated_at DESC, rowid DESC
                     LIMIT 1;"
                ),
                [user_id.to_string()],
                |row| Ok(parse_project_row(row)),
            )
            .optional()
            .at(Table::Projects, BackendStage::Select)?;
        row.transpose()
    }

    fn find_project_id(&self, user_id: UserId) -> BackendResult<Option<ProjectId>> {
        let id_text: Option<String> = self
            .conn()
            .query_row(
                "SELECT id FROM projects WHERE user_id = ?1 ORDER BY rowid ASC LIMIT 1;",
                [user_id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .at(Table::Projects, BackendStage::Select)?;
        id_text
            .map(|value| parse_uuid(Table::Projects, "id", &value))
            .transpose()
    }

    fn insert_project(&self, draft: &ProjectDraft) -> BackendResult<ProjectRecord> {
        let now_ms = self.now_ms();
        let record = ProjectRecord {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            answers: draft.answers.clone(),
            current_step: draft.current_step,
            completed: draft.completed,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        let project_data = encode_answers(&record.answers, BackendStage::Insert)?;

        self.conn()
            .execute(
                "INSERT INTO projects (
                    id, user_id, project_data, current_step, completed, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    record.id.to_string(),
                    record.user_id.to_string(),
                    project_data,
                    i64::from(record.current_step),
                    bool_to_int(record.completed),
                    record.created_at_ms,
                    record.updated_at_ms,
                ],
            )
            .at(Table::Projects, BackendStage::Insert)?;

        info!(
            "event=project_insert module=repo status=ok project_id={} step={} completed={}",
            record.id, record.current_step, record.completed
        );
        self.publish(ChangeKind::Insert, ChangeRow::Project(record.clone()));
        Ok(record)
    }

    fn update_project(&self, id: ProjectId, draft: &ProjectDraft) -> BackendResult<ProjectRecord> {
        let project_data = encode_answers(&draft.answers, BackendStage::Update)?;
        let changed = self
            .conn()
            .execute(
                "UPDATE projects
                 SET project_data = ?1, current_step = ?2, completed = ?3, updated_at = ?4
                 WHERE id = ?5;",
                params![
                    project_data,
                    i64::from(draft.current_step),
                    bool_to_int(draft.completed),
                    self.now_ms(),
                    id.to_string(),
                ],
            )
            .at(Table::Projects, BackendStage::Update)?;
        if changed == 0 {
            return Err(BackendError::not_found(
                Table::Projects,
                BackendStage::Update,
                id,
            ));
        }

        let record = self
            .conn()
            .query_row(
                &format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| Ok(parse_project_row(row)),
            )
            .at(Table::Projects, BackendStage::Update)??;

        info!(
            "event=project_update module=repo status=ok project_id={} step={} completed={}",
            record.id, record.current_step, record.completed
        );
        self.publish(ChangeKind::Update, ChangeRow::Project(record.clone()));
        Ok(record)
    }
}

fn encode_answers(answers: &ProjectAnswers, stage: BackendStage) -> BackendResult<String> {
    serde_json::to_string(answers).map_err(|err| BackendError::storage(Table::Projects, stage, err))
}

fn parse_project_row(row: &Row<'_>) -> BackendResult<ProjectRecord> {
    let select =
        |err: rusqlite::Error| BackendError::storage(Table::Projects, BackendStage::Select, err);

    let id_text: String = row.get("id").map_err(select)?;
    let user_text: String = row.get("user_id").map_err(select)?;
    let data_text: String = row.get("project_data").map_err(select)?;
    let answers: ProjectAnswers = serde_json::from_str(&data_text).map_err(|err| {
        BackendError::invalid_data(
            Table::Projects,
            format!("invalid json in projects.project_data: {err}"),
        )
    })?;
    let step: i64 = row.get("current_step").map_err(select)?;
    let current_step = u8::try_from(step).map_err(|_| {
        BackendError::invalid_data(
            Table::Projects,
            format!("invalid step `{step}` in projects.current_step"),
        )
    })?;
    let completed: i64 = row.get("completed").map_err(select)?;

    Ok(ProjectRecord {
        id: parse_uuid(Table::Projects, "id", &id_text)?,
        user_id: parse_uuid(Table::Projects, "user_id", &user_text)?,
        answers,
        current_step,
        completed: parse_flag(Table::Projects, "completed", completed)?,
        created_at_ms: row.get("created_at").map_err(select)?,
        updated_at_ms: row.get("updated_at").map_err(select)?,
    })
}
