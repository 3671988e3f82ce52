//! v001: interactions, project contexts (+ per-project interactions), skill progressions.
//!
//! Timestamps are unix milliseconds; sets, maps and rings are JSON text.

use rusqlite::Connection;

use rapport_core::RapportResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RapportResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS interactions (
            id            TEXT PRIMARY KEY,
            user_id       TEXT NOT NULL,
            channel       TEXT NOT NULL,
            user_text     TEXT NOT NULL,
            response_text TEXT NOT NULL,
            tags          TEXT NOT NULL,
            created_at    INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS project_contexts (
            user_id       TEXT NOT NULL,
            project_name  TEXT NOT NULL,
            technologies  TEXT NOT NULL DEFAULT '[]',
            languages     TEXT NOT NULL DEFAULT '[]',
            last_activity INTEGER NOT NULL,
            PRIMARY KEY (user_id, project_name)
        );

        CREATE TABLE IF NOT EXISTS project_interactions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      TEXT NOT NULL,
            project_name TEXT NOT NULL,
            timestamp    INTEGER NOT NULL,
            message      TEXT NOT NULL,
            response     TEXT NOT NULL,
            channel      TEXT NOT NULL,
            FOREIGN KEY (user_id, project_name)
                REFERENCES project_contexts(user_id, project_name) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS skill_progressions (
            user_id             TEXT NOT NULL,
            skill               TEXT NOT NULL,
            category            TEXT NOT NULL,
            interaction_count   INTEGER NOT NULL DEFAULT 0,
            level_progress      TEXT NOT NULL DEFAULT '{}',
            recent_interactions TEXT NOT NULL DEFAULT '[]',
            last_updated        INTEGER NOT NULL,
            PRIMARY KEY (user_id, skill)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
