//! Error types for the standup-store crate.
//!
//! All storage operations return [`StoreError`] via [`StoreResult`].
//! A missing row is not an error: lookups return `Ok(None)`.

use thiserror::Error;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the meeting store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite operation failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row could not be inserted.
    #[error("failed to write {table} row: {source}")]
    Write {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// The caller asked for something the store refuses to do, such as
    /// updating a meeting that has already been saved.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Creating or upgrading the schema failed.
    #[error("schema v{version} failed: {message}")]
    Schema { version: u32, message: String },

    /// A stored row holds a value that cannot be mapped back to a record.
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// The connection mutex was poisoned by a panicking holder.
    #[error("connection lock poisoned: {0}")]
    Poisoned(String),
}
