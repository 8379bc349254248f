//! Versioned schema lifecycle.
//!
//! The schema version lives in SQLite's `PRAGMA user_version`. A fresh file
//! (version 0) gets every table created. A file from an older version has
//! every table dropped and recreated: there is no column migration, so rows
//! written under the old version are discarded. A file from a newer version
//! is rejected.

use std::cmp::Ordering;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::meeting_dao;

/// Schema version written by this build. Bumping it wipes existing data.
pub const SCHEMA_VERSION: u32 = 1;

/// A table owned by the store.
struct Table {
    name: &'static str,
    /// `CREATE TABLE IF NOT EXISTS ...` statement(s).
    create_sql: &'static str,
}

/// Every table the store knows about, in creation order.
static TABLES: &[Table] = &[Table {
    name: meeting_dao::TABLE_NAME,
    create_sql: meeting_dao::CREATE_TABLE_SQL,
}];

// ── public API ───────────────────────────────────────────────────────

/// Bring the schema of `conn` to [`SCHEMA_VERSION`].
pub fn ensure(conn: &Connection) -> StoreResult<()> {
    ensure_version(conn, SCHEMA_VERSION)
}

/// Return the schema version recorded in the database file, 0 if none.
pub fn current_version(conn: &Connection) -> StoreResult<u32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StoreError::Schema {
            version: 0,
            message: format!("failed to read user_version: {e}"),
        })
}

// ── internals ────────────────────────────────────────────────────────

pub(crate) fn ensure_version(conn: &Connection, target: u32) -> StoreResult<()> {
    let current = current_version(conn)?;

    match current.cmp(&target) {
        Ordering::Equal => {
            debug!(version = current, "database schema is up to date");
            Ok(())
        }
        Ordering::Less if current == 0 => {
            info!(version = target, "creating database schema");
            in_transaction(conn, target, || create_all(conn))
        }
        Ordering::Less => {
            warn!(
                old_version = current,
                new_version = target,
                "upgrading database schema, existing meetings will be dropped"
            );
            in_transaction(conn, target, || {
                drop_all(conn)?;
                create_all(conn)
            })
        }
        Ordering::Greater => Err(StoreError::Schema {
            version: current,
            message: format!("database was written by a newer schema (expected v{target})"),
        }),
    }
}

fn create_all(conn: &Connection) -> rusqlite::Result<()> {
    for table in TABLES {
        debug!(table = table.name, "creating table");
        conn.execute_batch(table.create_sql)?;
    }
    Ok(())
}

fn drop_all(conn: &Connection) -> rusqlite::Result<()> {
    for table in TABLES.iter().rev() {
        debug!(table = table.name, "dropping table");
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", table.name))?;
    }
    Ok(())
}

/// Run `body` and stamp `version` inside one immediate transaction.
fn in_transaction<F>(conn: &Connection, version: u32, body: F) -> StoreResult<()>
where
    F: FnOnce() -> rusqlite::Result<()>,
{
    // `conn.transaction()` needs `&mut Connection`, so drive it by hand.
    conn.execute_batch("BEGIN IMMEDIATE;")
        .map_err(|e| StoreError::Schema {
            version,
            message: format!("failed to begin transaction: {e}"),
        })?;

    let result = body()
        .and_then(|()| conn.pragma_update(None, "user_version", version))
        .map_err(|e| StoreError::Schema {
            version,
            message: format!("SQL execution failed: {e}"),
        });

    match &result {
        Ok(()) => {
            conn.execute_batch("COMMIT;")
                .map_err(|e| StoreError::Schema {
                    version,
                    message: format!("failed to commit: {e}"),
                })?;
            info!(version, "schema ready");
        }
        Err(err) => {
            warn!(version, %err, "schema change failed, rolling back");
            let _ = conn.execute_batch("ROLLBACK;");
        }
    }

    result
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    fn insert_meeting(conn: &Connection) {
        conn.execute(
            "INSERT INTO meetings (team_name, meeting_time, num_participants, \
             individual_status_length, meeting_length, quickest_status, longest_status) \
             VALUES ('Alpha', 1000, 5, 120, 900, 30, 180)",
            [],
        )
        .unwrap();
    }

    fn meeting_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM meetings", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn fresh_database_starts_at_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_version(&conn).unwrap(), 0);
    }

    #[test]
    fn ensure_on_fresh_db_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();

        assert_eq!(current_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(table_names(&conn).contains(&"meetings".to_string()));
    }

    #[test]
    fn ensure_is_idempotent_and_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        insert_meeting(&conn);

        ensure(&conn).unwrap();
        assert_eq!(meeting_count(&conn), 1);
    }

    #[test]
    fn version_bump_drops_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        insert_meeting(&conn);

        ensure_version(&conn, SCHEMA_VERSION + 1).unwrap();

        assert_eq!(current_version(&conn).unwrap(), SCHEMA_VERSION + 1);
        assert_eq!(meeting_count(&conn), 0);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();

        let err = ensure(&conn).unwrap_err();
        assert!(matches!(err, StoreError::Schema { .. }));
    }

    #[test]
    fn not_null_columns_are_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO meetings (team_name, meeting_time, num_participants, \
             individual_status_length, meeting_length, quickest_status, longest_status) \
             VALUES (NULL, 1000, 5, 120, 900, 30, 180)",
            [],
        );
        assert!(result.is_err());
    }
}
