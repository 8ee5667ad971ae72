//! Core domain logic for the DOS entrepreneur dashboard.
//! This crate is the single source of truth for business invariants.

pub mod advisor;
pub mod catalog;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::{ConfigError, CoreConfig, PROJECT_DATA_KEY};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use export::{
    export_file_name, export_project_pdf, ExportError, ExportResult, ExportedDocument,
};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::account::{Profile, Role, Session, UserId, UserSummary};
pub use model::clock::{Clock, FixedClock, SystemClock};
pub use model::notification::{Notification, NotificationKind};
pub use model::project::{ProjectAnswers, ProjectRecord};
pub use model::task::{Task, TaskId, TaskStats, TaskStatus};
pub use repo::account_repo::{AccountStore, AuthBackend};
pub use repo::backend_types::{BackendError, BackendResult, BackendStage, Table};
pub use repo::local_store::{LocalStore, MemoryLocalStore, SqliteLocalStore};
pub use repo::notification_repo::NotificationStore;
pub use repo::project_repo::ProjectStore;
pub use repo::sqlite_backend::SqliteBackend;
pub use repo::task_repo::TaskStore;
pub use service::admin::AdminDashboard;
pub use service::calendar::Calendar;
pub use service::notice::{Notice, NoticeLevel};
pub use service::notifications::NotificationCenter;
pub use service::project_wizard::ProjectWizard;
pub use service::task_sync::TaskBoard;
pub use sync::change_feed::{ChangeEvent, ChangeFeed, ChangeKind, RowFilter, Subscription};
pub use sync::session::{SessionChange, SessionProvider};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
