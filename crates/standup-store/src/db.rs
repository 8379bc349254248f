//! SQLite database setup with WAL mode and connection sharing.
//!
//! The [`Database`] struct wraps a `rusqlite::Connection` behind an
//! `Arc<Mutex<>>`. Every call is synchronous and blocks the calling thread
//! for the duration of one statement.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::schema;

/// File name used when the caller does not pick one.
pub const DEFAULT_DATABASE_NAME: &str = "standup_timer.db";

/// Thread-safe handle to a SQLite database.
///
/// Cloning is cheap; all clones share the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a database at `path` and apply pragmas.
    ///
    /// The schema is not touched; call [`Database::init_schema`] or use
    /// [`Database::open_and_init`].
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)?;
        Self::apply_pragmas(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database — useful for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        debug!("opening in-memory database");

        let conn = Connection::open_in_memory()?;
        Self::apply_pragmas(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database and bring its schema to the current version.
    pub fn open_and_init(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Self::open(path)?;
        db.init_schema()?;
        Ok(db)
    }

    /// Create missing tables, or drop and recreate them after a version bump.
    pub fn init_schema(&self) -> StoreResult<()> {
        self.execute(schema::ensure)
    }

    /// Run a closure against the shared connection.
    ///
    /// The closure receives a `&Connection` and must return a `StoreResult<T>`.
    /// Statements and row iterators created inside are dropped before the
    /// lock is released.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let count: i64 = db.execute(|conn| {
    ///     Ok(conn.query_row("SELECT count(*) FROM meetings", [], |row| row.get(0))?)
    /// })?;
    /// ```
    pub fn execute<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&conn)
    }

    /// Run a closure that needs `&mut Connection` (transactions and friends).
    pub fn execute_mut<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&mut conn)
    }

    // ── pragmas ──────────────────────────────────────────────────────

    fn apply_pragmas(conn: &Connection) -> StoreResult<()> {
        debug!("applying SQLite pragmas");

        // WAL mode: readers do not block the writer.
        conn.pragma_update(None, "journal_mode", "WAL")?;

        // NORMAL is safe with WAL; a power loss can drop the last commit only.
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Concurrent writers wait instead of failing with SQLITE_BUSY.
        conn.pragma_update(None, "busy_timeout", 5_000_i32)?;

        Ok(())
    }
}

// ── tests ────────────────────────────────────────────────────────────
