use rusqlite::Connection;
use zerin_core::db::migrations::latest_version;
use zerin_core::db::open_db_in_memory;
use zerin_core::repo::kv::KvStore;
use zerin_core::{SqliteKvStore, StoreError};

#[test]
fn sqlite_store_roundtrips_and_overwrites_values() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();

    assert!(kv.get("zerin_users").unwrap().is_none());

    kv.set("zerin_users", "[]").unwrap();
    assert_eq!(kv.get("zerin_users").unwrap().as_deref(), Some("[]"));

    kv.set("zerin_users", "[{}]").unwrap();
    assert_eq!(kv.get("zerin_users").unwrap().as_deref(), Some("[{}]"));

    kv.remove("zerin_users").unwrap();
    assert!(kv.get("zerin_users").unwrap().is_none());
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKvStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_cells_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKvStore::try_new(&conn),
        Err(StoreError::MissingRequiredTable("cells"))
    ));
}

#[test]
fn file_backed_store_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zerin.sqlite3");

    {
        let conn = zerin_core::db::open_db(&path).unwrap();
        let kv = SqliteKvStore::try_new(&conn).unwrap();
        kv.set("zerin_persona", "{\"name\":\"ZERIN\"}").unwrap();
    }

    let conn = zerin_core::db::open_db(&path).unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    assert_eq!(
        kv.get("zerin_persona").unwrap().as_deref(),
        Some("{\"name\":\"ZERIN\"}")
    );
}
