//! Task board: local copy of a user's tasks kept in sync with the backend.
//!
//! # Responsibility
//! - Load (and on first use, seed) the user's task list.
//! - Apply realtime change events to the local copy.
//! - Issue status mutations optimistically and report the outcome as notices.
//!
//! # Invariants
//! - The change subscription is opened before the first fetch, so rows
//!   written while loading are never missed; duplicate inserts replace.
//! - A failed status update keeps the optimistic local state.
//! - Events for another user or another table are ignored.

use crate::model::account::UserId;
use crate::model::clock::Clock;
use crate::model::task::{
    upcoming_tasks, Task, TaskId, TaskPatch, TaskStats, TaskStatus, UPCOMING_TASK_LIMIT,
};
use crate::repo::backend_types::{BackendResult, Table};
use crate::repo::task_repo::TaskStore;
use crate::service::notice::Notice;
use crate::service::task_seed::default_tasks;
use crate::sync::change_feed::{
    ChangeEvent, ChangeFeed, ChangeKind, ChangeRow, RowFilter, Subscription,
};
use log::{error, info, warn};

pub const MSG_LOAD_FAILED: &str = "Erreur lors du chargement des tâches";
pub const MSG_SEED_FAILED: &str = "Erreur lors de la création des tâches";
pub const MSG_UPDATE_FAILED: &str = "Erreur lors de la mise à jour de la tâche";
pub const MSG_TASK_COMPLETED: &str = "Tâche marquée comme terminée !";

pub struct TaskBoard<'a, B: TaskStore + ChangeFeed + ?Sized> {
    backend: &'a B,
    clock: &'a dyn Clock,
    user_id: UserId,
    tasks: Vec<Task>,
    loading: bool,
    subscription: Option<Subscription>,
    notices: Vec<Notice>,
}

impl<'a, B: TaskStore + ChangeFeed + ?Sized> TaskBoard<'a, B> {
    /// Subscribes to the user's task rows, then loads or seeds the list.
    pub fn attach(backend: &'a B, clock: &'a dyn Clock, user_id: UserId) -> Self {
        let subscription = match backend.subscribe(RowFilter::new(Table::Tasks, user_id)) {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                warn!(
                    "event=tasks_subscribe module=service status=error error_code={}",
                    err.code
                );
                None
            }
        };

        let mut board = Self {
            backend,
            clock,
            user_id,
            tasks: Vec::new(),
            loading: true,
            subscription,
            notices: Vec::new(),
        };
        board.reload();
        board
    }

    /// Re-fetches the list; an empty list triggers seeding.
    pub fn reload(&mut self) {
        self.loading = true;
        match self.backend.list_tasks(self.user_id) {
            Ok(tasks) if tasks.is_empty() => self.seed_defaults(),
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=service status=ok count={}",
                    tasks.len()
                );
                self.tasks = tasks;
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=service status=error error_code={} error={}",
                    err.code, err
                );
                self.tasks.clear();
                self.notices.push(Notice::error(MSG_LOAD_FAILED));
            }
        }
        self.loading = false;
    }

    fn seed_defaults(&mut self) {
        let seeds = default_tasks(self.user_id, self.clock.now_ms());
        match self.backend.insert_tasks(&seeds) {
            Ok(inserted) if inserted.len() == seeds.len() => {
                info!(
                    "event=tasks_seed module=service status=ok count={}",
                    inserted.len()
                );
                self.tasks = inserted;
            }
            Ok(inserted) => {
                // Another client seeded concurrently; adopt what is stored.
                warn!(
                    "event=tasks_seed module=service status=partial inserted={} requested={}",
                    inserted.len(),
                    seeds.len()
                );
                match self.backend.list_tasks(self.user_id) {
                    Ok(tasks) => self.tasks = tasks,
                    Err(err) => {
                        error!(
                            "event=tasks_load module=service status=error error_code={}",
                            err.code
                        );
                        self.tasks = inserted;
                        self.notices.push(Notice::error(MSG_LOAD_FAILED));
                    }
                }
            }
            Err(err) => {
                error!(
                    "event=tasks_seed module=service status=error error_code={} error={}",
                    err.code, err
                );
                self.notices.push(Notice::error(MSG_SEED_FAILED));
            }
        }
    }

    /// Applies every pending change event; returns how many touched the list.
    pub fn poll_changes(&mut self) -> usize {
        let events = match &self.subscription {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };
        events
            .iter()
            .filter(|event| self.apply_change(event))
            .count()
    }

    /// Applies one change event to the local list.
    pub fn apply_change(&mut self, event: &ChangeEvent) -> bool {
        let ChangeRow::Task(task) = &event.row else {
            return false;
        };
        if task.user_id != self.user_id {
            return false;
        }

        let position = self.tasks.iter().position(|current| current.id == task.id);
        match (event.kind, position) {
            (ChangeKind::Insert | ChangeKind::Update, Some(index)) => {
                self.tasks[index] = task.clone();
                true
            }
            (ChangeKind::Insert, None) => {
                self.tasks.push(task.clone());
                true
            }
            (ChangeKind::Delete, Some(index)) => {
                self.tasks.remove(index);
                true
            }
            (ChangeKind::Update | ChangeKind::Delete, None) => false,
        }
    }

    pub fn complete(&mut self, id: TaskId) -> BackendResult<Task> {
        self.set_status(id, TaskStatus::Completed)
    }

    pub fn start(&mut self, id: TaskId) -> BackendResult<Task> {
        self.set_status(id, TaskStatus::InProgress)
    }

    pub fn reset(&mut self, id: TaskId) -> BackendResult<Task> {
        self.set_status(id, TaskStatus::Pending)
    }

    /// Changes a task's status locally, then on the backend.
    ///
    /// # Errors
    /// Returns the backend error after queueing an error notice; the local
    /// change is kept.
    pub fn set_status(&mut self, id: TaskId, status: TaskStatus) -> BackendResult<Task> {
        let now_ms = self.clock.now_ms();
        let patch = TaskPatch::for_status(status, now_ms);
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.apply_patch(&patch, now_ms);
        }

        match self.backend.update_task(id, &patch) {
            Ok(stored) => {
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
                    *task = stored.clone();
                }
                if status == TaskStatus::Completed {
                    self.notices.push(Notice::success(MSG_TASK_COMPLETED));
                }
                info!(
                    "event=task_status module=service status=ok task_id={} new_status={}",
                    id,
                    status.as_str()
                );
                Ok(stored)
            }
            Err(err) => {
                error!(
                    "event=task_status module=service status=error task_id={} error_code={}",
                    id, err.code
                );
                self.notices.push(Notice::error(MSG_UPDATE_FAILED));
                Err(err)
            }
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Next open tasks by due date, capped at `UPCOMING_TASK_LIMIT`.
    pub fn upcoming(&self) -> Vec<Task> {
        upcoming_tasks(&self.tasks, UPCOMING_TASK_LIMIT)
    }

    /// Drains queued notices in the order they were raised.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Releases the change subscription; the list stops following the backend.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            info!("event=tasks_detach module=service status=ok");
        }
    }
}
