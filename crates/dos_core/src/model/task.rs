//! Task domain model and dashboard derivations.
//!
//! # Responsibility
//! - Define the `user_tasks` row shape and its status lifecycle.
//! - Provide read-only views used by the dashboard (stats, upcoming list).
//!
//! # Invariants
//! - `completed_at_ms` is `Some` iff `status == TaskStatus::Completed` after
//!   any patch built by `TaskPatch::for_status`.
//! - One row per `(user_id, task_key)` is intended.

use crate::model::account::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable task row identifier.
pub type TaskId = Uuid;

/// Maximum number of entries in the dashboard "upcoming" list.
pub const UPCOMING_TASK_LIMIT: usize = 5;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet.
    Pending,
    /// Work is in progress.
    InProgress,
    /// Done; carries a completion timestamp.
    Completed,
}

impl TaskStatus {
    /// Wire/database name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// One tracked task owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    /// Stable key used to match rows against the default set.
    pub task_key: String,
    pub title: String,
    pub description: Option<String>,
    /// Free-form category tag (`project`, `business`, `legal`, ...).
    pub category: String,
    pub status: TaskStatus,
    pub due_at_ms: Option<i64>,
    pub completed_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Applies a status patch locally, mirroring what the store does.
    pub fn apply_patch(&mut self, patch: &TaskPatch, now_ms: i64) {
        self.status = patch.status;
        self.completed_at_ms = patch.completed_at_ms;
        self.updated_at_ms = now_ms;
    }
}

/// Insert shape for a task row; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub user_id: UserId,
    pub task_key: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub status: TaskStatus,
    pub due_at_ms: Option<i64>,
    pub completed_at_ms: Option<i64>,
}

/// Partial update applied by status mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPatch {
    pub status: TaskStatus,
    pub completed_at_ms: Option<i64>,
}

impl TaskPatch {
    /// Builds the patch for a status change.
    ///
    /// Completion stamps `now_ms`; any other status clears the stamp.
    pub fn for_status(status: TaskStatus, now_ms: i64) -> Self {
        let completed_at_ms = match status {
            TaskStatus::Completed => Some(now_ms),
            TaskStatus::Pending | TaskStatus::InProgress => None,
        };
        Self {
            status,
            completed_at_ms,
        }
    }
}

/// Counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    /// `round(100 * completed / total)`, `0` for an empty list.
    pub completion_percent: u32,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }
        stats.completion_percent = completion_percent(stats.completed, stats.total);
        stats
    }
}

/// Integer `round(100 * done / total)` with halves rounded up.
pub fn completion_percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * done + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Returns the soonest-due open tasks, ascending by due date.
///
/// Completed tasks and tasks without a due date are excluded. Ties keep
/// their input order.
pub fn upcoming_tasks(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.is_completed() && task.due_at_ms.is_some())
        .collect();
    upcoming.sort_by_key(|task| task.due_at_ms);
    upcoming.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::{completion_percent, upcoming_tasks, Task, TaskPatch, TaskStats, TaskStatus};
    use uuid::Uuid;

    fn task(key: &str, status: TaskStatus, due_at_ms: Option<i64>) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            task_key: key.to_string(),
            title: key.to_string(),
            description: None,
            category: "project".to_string(),
            status,
            due_at_ms,
            completed_at_ms: None,
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }

    #[test]
    fn completion_percent_rounds_half_up_and_handles_empty() {
        assert_eq!(completion_percent(0, 0), 0);
        assert_eq!(completion_percent(1, 8), 13);
        assert_eq!(completion_percent(1, 3), 33);
        assert_eq!(completion_percent(2, 3), 67);
        assert_eq!(completion_percent(8, 8), 100);
    }

    #[test]
    fn stats_count_each_status() {
        let tasks = vec![
            task("a", TaskStatus::Completed, None),
            task("b", TaskStatus::Pending, None),
            task("c", TaskStatus::InProgress, None),
            task("d", TaskStatus::Pending, None),
        ];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completion_percent, 25);
    }

    #[test]
    fn patch_for_status_stamps_only_completion() {
        assert_eq!(
            TaskPatch::for_status(TaskStatus::Completed, 42).completed_at_ms,
            Some(42)
        );
        assert_eq!(
            TaskPatch::for_status(TaskStatus::InProgress, 42).completed_at_ms,
            None
        );
        assert_eq!(
            TaskPatch::for_status(TaskStatus::Pending, 42).completed_at_ms,
            None
        );
    }

    #[test]
    fn upcoming_skips_completed_and_undated_and_caps_length() {
        let tasks = vec![
            task("late", TaskStatus::Pending, Some(600)),
            task("done", TaskStatus::Completed, Some(1)),
            task("undated", TaskStatus::Pending, None),
            task("t1", TaskStatus::InProgress, Some(100)),
            task("t2", TaskStatus::Pending, Some(300)),
            task("t3", TaskStatus::Pending, Some(200)),
            task("t4", TaskStatus::Pending, Some(500)),
            task("t5", TaskStatus::Pending, Some(400)),
        ];

        let upcoming = upcoming_tasks(&tasks, 5);
        let keys: Vec<&str> = upcoming.iter().map(|t| t.task_key.as_str()).collect();
        assert_eq!(keys, vec!["t1", "t3", "t2", "t5", "t4"]);
    }
}
