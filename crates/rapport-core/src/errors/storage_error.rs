/// Persistence-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    SqliteError { message: String },

    #[error("migration v{version:03} failed: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("connection lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("corrupt row in {table}: {reason}")]
    CorruptRow { table: &'static str, reason: String },
}
