use dos_core::{open_db, open_db_in_memory, LocalStore, SqliteLocalStore, PROJECT_DATA_KEY};

#[test]
fn sqlite_store_replaces_and_removes_values() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocalStore::try_new(&conn).unwrap();

    assert_eq!(store.get_item(PROJECT_DATA_KEY).unwrap(), None);
    store.set_item(PROJECT_DATA_KEY, "{\"a\":1}").unwrap();
    store.set_item(PROJECT_DATA_KEY, "{\"a\":2}").unwrap();
    assert_eq!(
        store.get_item(PROJECT_DATA_KEY).unwrap().as_deref(),
        Some("{\"a\":2}")
    );

    store.remove_item(PROJECT_DATA_KEY).unwrap();
    assert_eq!(store.get_item(PROJECT_DATA_KEY).unwrap(), None);
    // Removing a missing key is not an error.
    store.remove_item(PROJECT_DATA_KEY).unwrap();
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("device.db");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteLocalStore::try_new(&conn).unwrap();
        store.set_item(PROJECT_DATA_KEY, "persisted").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteLocalStore::try_new(&conn).unwrap();
    assert_eq!(
        store.get_item(PROJECT_DATA_KEY).unwrap().as_deref(),
        Some("persisted")
    );
}

#[test]
fn sqlite_store_rejects_unmigrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert!(SqliteLocalStore::try_new(&conn).is_err());
}
