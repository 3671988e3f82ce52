use super::StorageError;

/// Top-level error type for the rapport pattern memory.
/// Subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum RapportError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("aggregation failed for user {user_id}: {reason}")]
    AggregationFailed { user_id: String, reason: String },
}

impl From<toml::de::Error> for RapportError {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

/// Convenience type alias.
pub type RapportResult<T> = Result<T, RapportError>;
