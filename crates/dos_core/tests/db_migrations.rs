use dos_core::db::migrations::latest_version;
use dos_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "profiles",
        "credentials",
        "user_roles",
        "user_tasks",
        "projects",
        "notifications",
        "local_kv",
    ] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dos.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "user_tasks");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn task_keys_are_unique_per_user() {
    let conn = open_db_in_memory().unwrap();
    let insert = "INSERT INTO user_tasks (
            id, user_id, task_key, title, category, status, created_at, updated_at
        ) VALUES (?1, 'u1', 'business_plan', 't', 'business', 'pending', 0, 0);";

    conn.execute(insert, ["a"]).unwrap();
    let duplicate = conn.execute(insert, ["b"]);
    assert!(duplicate.is_err());
}

#[test]
fn deleting_a_profile_cascades_to_roles_and_credentials() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO profiles (user_id, email, created_at) VALUES ('u1', 'a@b.fr', 0);
         INSERT INTO credentials (user_id, email, password_hash) VALUES ('u1', 'a@b.fr', 'x');
         INSERT INTO user_roles (user_id, role) VALUES ('u1', 'user');
         DELETE FROM profiles WHERE user_id = 'u1';",
    )
    .unwrap();

    let remaining: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM credentials) + (SELECT COUNT(*) FROM user_roles);",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
