//! SQLite implementation of the backend collaborator traits.
//!
//! # Responsibility
//! - Hold the connection, clock and change hub shared by the per-table
//!   trait implementations (`task_repo`, `project_repo`, ...).
//! - Reject connections that were not bootstrapped through `db::open_db*`.
//!
//! # Invariants
//! - Change events are published only after the mutating statement (or
//!   transaction) has succeeded.
//! - Row-level access rules of the hosted service are not emulated; every
//!   call is scoped by the ids the caller passes.

use crate::db::{ensure_tables, DbResult};
use crate::model::clock::{Clock, SystemClock};
use crate::repo::backend_types::{BackendError, BackendResult, Table};
use crate::sync::change_feed::{
    ChangeEvent, ChangeFeed, ChangeHub, ChangeKind, ChangeRow, RowFilter, Subscription,
};
use log::debug;
use rusqlite::Connection;
use std::sync::Arc;
use uuid::Uuid;

const REQUIRED_TABLES: [&str; 6] = [
    "profiles",
    "credentials",
    "user_roles",
    "user_tasks",
    "projects",
    "notifications",
];

/// Backend stand-in over one migrated SQLite connection.
pub struct SqliteBackend<'conn> {
    conn: &'conn Connection,
    hub: ChangeHub,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<'conn> SqliteBackend<'conn> {
    /// Wraps `conn` with the wall clock.
    ///
    /// # Errors
    /// - `DbError::UninitializedConnection` / `MissingRequiredTable` when the
    ///   connection was not opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        Self::try_with_clock(conn, Arc::new(SystemClock))
    }

    /// Wraps `conn` with an explicit time source.
    pub fn try_with_clock(
        conn: &'conn Connection,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> DbResult<Self> {
        ensure_tables(conn, &REQUIRED_TABLES)?;
        Ok(Self {
            conn,
            hub: ChangeHub::new(),
            clock,
        })
    }

    /// Hub that this backend publishes into. Cloning shares subscribers.
    pub fn hub(&self) -> &ChangeHub {
        &self.hub
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub(crate) fn publish(&self, kind: ChangeKind, row: ChangeRow) {
        let table = row.table();
        let delivered = self.hub.publish(&ChangeEvent::new(kind, row));
        debug!(
            "event=feed_publish module=repo status=ok table={} kind={:?} delivered={}",
            table.as_str(),
            kind,
            delivered
        );
    }
}

impl ChangeFeed for SqliteBackend<'_> {
    fn subscribe(&self, filter: RowFilter) -> BackendResult<Subscription> {
        Ok(self.hub.subscribe(filter))
    }
}

pub(crate) fn parse_uuid(table: Table, column: &str, value: &str) -> BackendResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| {
        BackendError::invalid_data(
            table,
            format!("invalid uuid value `{value}` in {}.{column}", table.as_str()),
        )
    })
}

pub(crate) fn parse_flag(table: Table, column: &str, value: i64) -> BackendResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(BackendError::invalid_data(
            table,
            format!("invalid flag value `{other}` in {}.{column}", table.as_str()),
        )),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteBackend;
    use crate::db::{open_db_in_memory, DbError};
    use rusqlite::Connection;

    #[test]
    fn rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let result = SqliteBackend::try_new(&conn);
        assert!(matches!(
            result,
            Err(DbError::UninitializedConnection { .. })
        ));
    }

    #[test]
    fn accepts_bootstrapped_connection() {
        let conn = open_db_in_memory().unwrap();
        let backend = SqliteBackend::try_new(&conn).unwrap();
        assert_eq!(backend.hub().subscriber_count(), 0);
    }
}
