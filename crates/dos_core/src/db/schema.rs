//! Connection readiness checks shared by SQLite-backed stores.

use super::migrations::latest_version;
use super::{DbError, DbResult};
use rusqlite::Connection;

/// Verifies that `conn` is fully migrated and exposes every table in `tables`.
///
/// # Errors
/// - `UninitializedConnection` when `PRAGMA user_version` differs from the
///   latest known migration.
/// - `MissingRequiredTable` for the first absent table.
pub fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> DbResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        if !table_exists(conn, table)? {
            return Err(DbError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
