use calorie_core::db::migrations::latest_version;
use calorie_core::db::{open_db, DbConfig, DbError};
use calorie_core::{NewUser, Store, UserRepository};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn open_in_memory_applies_all_migrations() {
    let conn = open_db(&DbConfig::in_memory()).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "meals");
    assert_table_exists(&conn, "ingredients");
    assert_table_exists(&conn, "ingredients_in_meal");
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db(&DbConfig::in_memory()).unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.db");

    let store = Store::open(&DbConfig::file(&path)).unwrap();
    assert_eq!(store.schema_version().unwrap(), latest_version());
    store.close().unwrap();

    let store = Store::open(&DbConfig::file(&path).with_busy_timeout(Duration::from_millis(250)))
        .unwrap();
    assert_eq!(store.schema_version().unwrap(), latest_version());
}

#[test]
fn data_survives_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::file(dir.path().join("tracker.db"));

    {
        let mut store = Store::open(&config).unwrap();
        let uow = store.begin().unwrap();
        uow.create_user(&NewUser::new("Alice")).unwrap();
        uow.commit().unwrap();
        store.close().unwrap();
    }

    let store = Store::open(&config).unwrap();
    let users = store.users().list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Alice");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&DbConfig::file(&path)).unwrap_err();
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
fn schema_rejects_oversize_names_even_without_validation() {
    let conn = open_db(&DbConfig::in_memory()).unwrap();
    let err = conn
        .execute(
            "INSERT INTO users (name) VALUES (?1);",
            ["seventeen-chars!!"],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK"));
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
