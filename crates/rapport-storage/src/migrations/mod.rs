//! Migration runner: version tracking, forward-only, transactional per migration.

mod v001_initial_schema;
mod v002_window_indexes;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use rapport_core::errors::StorageError;
use rapport_core::{RapportError, RapportResult};

use crate::to_storage_err;

pub const LATEST_VERSION: u32 = 2;

type MigrationFn = fn(&Connection) -> RapportResult<()>;

const MIGRATIONS: [(u32, &str, MigrationFn); 2] = [
    (1, "initial_schema", v001_initial_schema::migrate),
    (2, "window_indexes", v002_window_indexes::migrate),
];

/// Current schema version, 0 when the `schema_version` table doesn't exist yet.
pub fn current_version(conn: &Connection) -> RapportResult<u32> {
    let exists: bool = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version'")
        .and_then(|mut stmt| stmt.exists([]))
        .map_err(|e| to_storage_err(e.to_string()))?;

    if !exists {
        return Ok(0);
    }

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Run all pending migrations. Returns how many were applied.
pub fn run_migrations(conn: &Connection) -> RapportResult<u32> {
    let current = current_version(conn)?;

    if current >= LATEST_VERSION {
        debug!("database schema is up to date (v{current})");
        return Ok(0);
    }

    info!(from = current, to = LATEST_VERSION, "running migrations");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL DEFAULT (unixepoch())
        );",
    )
    .map_err(|e| to_storage_err(format!("create schema_version: {e}")))?;

    let mut applied = 0;
    for &(version, name, migrate_fn) in &MIGRATIONS {
        if version <= current {
            continue;
        }

        debug!("applying migration v{version:03}: {name}");

        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| to_storage_err(format!("begin transaction for v{version:03}: {e}")))?;

        let result = migrate_fn(conn).and_then(|_| {
            conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
                .map(|_| ())
                .map_err(|e| to_storage_err(format!("record version v{version:03}: {e}")))
        });

        match result {
            Ok(()) => {
                conn.execute_batch("COMMIT")
                    .map_err(|e| to_storage_err(format!("commit v{version:03}: {e}")))?;
                info!("applied migration v{version:03}: {name}");
                applied += 1;
            }
            Err(e) => {
                warn!("migration v{version:03} failed: {e}, rolling back");
                let _ = conn.execute_batch("ROLLBACK");
                return Err(RapportError::StorageError(StorageError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                }));
            }
        }
    }

    info!("applied {applied} migration(s), now at v{LATEST_VERSION}");
    Ok(applied)
}
