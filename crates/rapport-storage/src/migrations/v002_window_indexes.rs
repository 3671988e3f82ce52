//! v002: indexes backing the per-user time-window scans and channel resets.

use rusqlite::Connection;

use rapport_core::RapportResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RapportResult<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_interactions_user_time
            ON interactions(user_id, created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_interactions_channel
            ON interactions(channel);
        CREATE INDEX IF NOT EXISTS idx_projects_user_activity
            ON project_contexts(user_id, last_activity DESC);
        CREATE INDEX IF NOT EXISTS idx_project_interactions_key
            ON project_interactions(user_id, project_name, timestamp);
        CREATE INDEX IF NOT EXISTS idx_skills_user_updated
            ON skill_progressions(user_id, last_updated DESC);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
