//! Storage subsystem configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database. `None` opens an in-memory database.
    pub db_path: Option<String>,
    /// Number of read-only connections in the pool (file-backed only).
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            read_pool_size: 2,
        }
    }
}
