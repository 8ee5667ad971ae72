//! Shared types for calls across the hosted-backend boundary.
//!
//! # Responsibility
//! - Name the backend tables the core reads and writes.
//! - Carry one error envelope for every failed backend call.
//!
//! # Invariants
//! - `code` values are stable snake_case identifiers; UI and tests match on
//!   them, never on `message`.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BackendResult<T> = Result<T, BackendError>;

/// Backend tables touched by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Tasks,
    Projects,
    Notifications,
    Profiles,
    UserRoles,
    Credentials,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "user_tasks",
            Self::Projects => "projects",
            Self::Notifications => "notifications",
            Self::Profiles => "profiles",
            Self::UserRoles => "user_roles",
            Self::Credentials => "credentials",
        }
    }
}

/// Operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStage {
    Auth,
    Select,
    Insert,
    Update,
    Delete,
    Subscribe,
}

impl BackendStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Subscribe => "subscribe",
        }
    }
}

pub const CODE_NOT_FOUND: &str = "not_found";
pub const CODE_CONFLICT: &str = "conflict";
pub const CODE_INVALID_CREDENTIALS: &str = "invalid_credentials";
pub const CODE_INVALID_INPUT: &str = "invalid_input";
pub const CODE_INVALID_DATA: &str = "invalid_data";
pub const CODE_FORBIDDEN: &str = "forbidden";
pub const CODE_STORAGE: &str = "storage_error";
pub const CODE_UNAVAILABLE: &str = "unavailable";

/// Error envelope for a failed backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub table: Table,
    pub stage: BackendStage,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl BackendError {
    pub fn new(
        table: Table,
        stage: BackendStage,
        code: &'static str,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            table,
            stage,
            code,
            message: message.into(),
            retryable,
        }
    }

    pub fn not_found(table: Table, stage: BackendStage, id: impl Display) -> Self {
        Self::new(
            table,
            stage,
            CODE_NOT_FOUND,
            format!("row not found: {id}"),
            false,
        )
    }

    pub fn invalid_data(table: Table, message: impl Into<String>) -> Self {
        Self::new(table, BackendStage::Select, CODE_INVALID_DATA, message, false)
    }

    /// Wraps a storage failure of the SQLite stand-in.
    pub fn storage(table: Table, stage: BackendStage, err: impl Display) -> Self {
        Self::new(table, stage, CODE_STORAGE, err.to_string(), true)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == CODE_NOT_FOUND
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} failed ({}): {}",
            self.table.as_str(),
            self.stage.as_str(),
            self.code,
            self.message
        )
    }
}

impl Error for BackendError {}

/// Lets SQLite call sites use `?` and tag the table/stage afterwards.
pub(crate) trait StorageContext<T> {
    fn at(self, table: Table, stage: BackendStage) -> BackendResult<T>;
}

impl<T> StorageContext<T> for Result<T, rusqlite::Error> {
    fn at(self, table: Table, stage: BackendStage) -> BackendResult<T> {
        self.map_err(|err| BackendError::storage(table, stage, err))
    }
}

impl<T> StorageContext<T> for Result<T, DbError> {
    fn at(self, table: Table, stage: BackendStage) -> BackendResult<T> {
        self.map_err(|err| BackendError::storage(table, stage, err))
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendError, BackendStage, Table, CODE_NOT_FOUND};

    #[test]
    fn display_names_table_stage_and_code() {
        let err = BackendError::not_found(Table::Tasks, BackendStage::Update, "abc");
        assert_eq!(err.code, CODE_NOT_FOUND);
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "user_tasks update failed (not_found): row not found: abc"
        );
    }
}
