//! # rapport-storage
//!
//! SQLite persistence layer for the rapport pattern memory.
//! Implements `IPatternStorage` over three stores: the append-only interaction log,
//! per-project contexts and per-skill progressions.
//! Single write connection + read pool (WAL mode).

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod pragmas;
pub mod queries;

pub use engine::SqlitePatternStorage;
pub use pool::ConnectionPool;

/// Helper to convert a string message into a RapportError::StorageError.
pub fn to_storage_err(msg: String) -> rapport_core::RapportError {
    rapport_core::RapportError::StorageError(rapport_core::errors::StorageError::SqliteError {
        message: msg,
    })
}

/// Helper for rows whose JSON or enum columns fail to decode.
pub(crate) fn corrupt_row(table: &'static str, reason: impl ToString) -> rapport_core::RapportError {
    rapport_core::RapportError::StorageError(rapport_core::errors::StorageError::CorruptRow {
        table,
        reason: reason.to_string(),
    })
}
