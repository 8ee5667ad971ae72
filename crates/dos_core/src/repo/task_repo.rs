//! Task store contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `user_tasks` for the task board.
//!
//! # Invariants
//! - Lists are ordered by `created_at ASC`, ties by insertion order.
//! - Inserting a `(user_id, task_key)` pair that already exists is a no-op;
//!   the returned list only contains rows actually written.

use crate::model::account::UserId;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};
use crate::repo::backend_types::{
    BackendError, BackendResult, BackendStage, StorageContext, Table,
};
use crate::repo::sqlite_backend::{parse_uuid, SqliteBackend};
use crate::sync::change_feed::{ChangeKind, ChangeRow};
use log::{error, info};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    task_key,
    title,
    description,
    category,
    status,
    due_at,
    completed_at,
    created_at,
    updated_at
FROM user_tasks";

/// Remote task rows.
pub trait TaskStore {
    fn list_tasks(&self, user_id: UserId) -> BackendResult<Vec<Task>>;
    fn get_task(&self, id: TaskId) -> BackendResult<Task>;
    /// Inserts `tasks` and returns the rows as stored.
    fn insert_tasks(&self, tasks: &[NewTask]) -> BackendResult<Vec<Task>>;
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> BackendResult<Task>;
    fn delete_task(&self, id: TaskId) -> BackendResult<()>;
}

impl TaskStore for SqliteBackend<'_> {
    fn list_tasks(&self, user_id: UserId) -> BackendResult<Vec<Task>> {
        let mut stmt = self
            .conn()
            .prepare(&format!(
                "{TASK_SELECT_SQL}
                 WHERE user_id = ?1
                 ORDER BY created_at ASC, rowid ASC;"
            ))
            .at(Table::Tasks, BackendStage::Select)?;
        let mut rows = stmt
            .query([user_id.to_string()])
            .at(Table::Tasks, BackendStage::Select)?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().at(Table::Tasks, BackendStage::Select)? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn get_task(&self, id: TaskId) -> BackendResult<Task> {
        fetch_task(self, id, BackendStage::Select)
    }

    fn insert_tasks(&self, tasks: &[NewTask]) -> BackendResult<Vec<Task>> {
        let now_ms = self.now_ms();
        let tx = self
            .conn()
            .unchecked_transaction()
            .at(Table::Tasks, BackendStage::Insert)?;

        let mut inserted = Vec::with_capacity(tasks.len());
        for new_task in tasks {
            let task = Task {
                id: Uuid::new_v4(),
                user_id: new_task.user_id,
                task_key: new_task.task_key.clone(),
                title: new_task.title.clone(),
                description: new_task.description.clone(),
                category: new_task.category.clone(),
                status: new_task.status,
                due_at_ms: new_task.due_at_ms,
                completed_at_ms: new_task.completed_at_ms,
                created_at_ms: now_ms,
                updated_at_ms: now_ms,
            };
            let changed = tx
                .execute(
                    "INSERT INTO user_tasks (
                        id, user_id, task_key, title, description, category,
                        status, due_at, completed_at, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                    ON CONFLICT (user_id, task_key) DO NOTHING;",
                    params![
                        task.id.to_string(),
                        task.user_id.to_string(),
                        task.task_key.as_str(),
                        task.title.as_str(),
                        task.description.as_deref(),
                        task.category.as_str(),
                        task.status.as_str(),
                        task.due_at_ms,
                        task.completed_at_ms,
                        task.created_at_ms,
                        task.updated_at_ms,
                    ],
                )
                .at(Table::Tasks, BackendStage::Insert)?;
            if changed == 1 {
                inserted.push(task);
            }
        }

        if let Err(err) = tx.commit() {
            error!(
                "event=tasks_insert module=repo status=error requested={} error={}",
                tasks.len(),
                err
            );
            return Err(BackendError::storage(Table::Tasks, BackendStage::Insert, err));
        }

        info!(
            "event=tasks_insert module=repo status=ok requested={} inserted={}",
            tasks.len(),
            inserted.len()
        );
        for task in &inserted {
            self.publish(ChangeKind::Insert, ChangeRow::Task(task.clone()));
        }
        Ok(inserted)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> BackendResult<Task> {
        let changed = self
            .conn()
            .execute(
                "UPDATE user_tasks
                 SET status = ?1, completed_at = ?2, updated_at = ?3
                 WHERE id = ?4;",
                params![
                    patch.status.as_str(),
                    patch.completed_at_ms,
                    self.now_ms(),
                    id.to_string(),
                ],
            )
            .at(Table::Tasks, BackendStage::Update)?;
        if changed == 0 {
            return Err(BackendError::not_found(Table::Tasks, BackendStage::Update, id));
        }

        let task = fetch_task(self, id, BackendStage::Update)?;
        self.publish(ChangeKind::Update, ChangeRow::Task(task.clone()));
        Ok(task)
    }

    fn delete_task(&self, id: TaskId) -> BackendResult<()> {
        let task = fetch_task(self, id, BackendStage::Delete)?;
        self.conn()
            .execute("DELETE FROM user_tasks WHERE id = ?1;", [id.to_string()])
            .at(Table::Tasks, BackendStage::Delete)?;
        self.publish(ChangeKind::Delete, ChangeRow::Task(task));
        Ok(())
    }
}

fn fetch_task(
    backend: &SqliteBackend<'_>,
    id: TaskId,
    stage: BackendStage,
) -> BackendResult<Task> {
    let row = backend
        .conn()
        .query_row(
            &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
            [id.to_string()],
            |row| Ok(parse_task_row(row)),
        )
        .optional()
        .at(Table::Tasks, stage)?;
    match row {
        Some(task) => task,
        None => Err(BackendError::not_found(Table::Tasks, stage, id)),
    }
}

fn parse_task_row(row: &Row<'_>) -> BackendResult<Task> {
    let select =
        |err: rusqlite::Error| BackendError::storage(Table::Tasks, BackendStage::Select, err);

    let id_text: String = row.get("id").map_err(select)?;
    let user_text: String = row.get("user_id").map_err(select)?;
    let status_text: String = row.get("status").map_err(select)?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        BackendError::invalid_data(
            Table::Tasks,
            format!("invalid task status `{status_text}` in user_tasks.status"),
        )
    })?;

    Ok(Task {
        id: parse_uuid(Table::Tasks, "id", &id_text)?,
        user_id: parse_uuid(Table::Tasks, "user_id", &user_text)?,
        task_key: row.get("task_key").map_err(select)?,
        title: row.get("title").map_err(select)?,
        description: row.get("description").map_err(select)?,
        category: row.get("category").map_err(select)?,
        status,
        due_at_ms: row.get("due_at").map_err(select)?,
        completed_at_ms: row.get("completed_at").map_err(select)?,
        created_at_ms: row.get("created_at").map_err(select)?,
        updated_at_ms: row.get("updated_at").map_err(select)?,
    })
}
