//! Administrative hard delete.
//!
//! Interactions and project entries are filtered by user and/or channel. Projects
//! left with no entries are dropped; the rest get `last_activity` recomputed.
//! Skill progressions are dropped for a user-wide reset. A channel-scoped reset
//! removes that channel's entries from each recent-interaction ring, backs them out
//! of the totals, and drops progressions left with no entries.

use rusqlite::{params, Connection};
use tracing::{debug, info};

use rapport_core::{RapportResult, ResetCounts, ResetFilter};

use super::skill_ops::{list_skill_progressions, write_progression};
use crate::to_storage_err;

pub fn delete_memory(conn: &Connection, filter: &ResetFilter) -> RapportResult<ResetCounts> {
    filter.validate()?;
    let user_id = non_blank(filter.user_id.as_deref());
    let channel = non_blank(filter.channel.as_deref());

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("begin reset: {e}")))?;
    let mut counts = ResetCounts::default();

    counts.interactions = tx
        .execute(
            "DELETE FROM interactions
             WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR channel = ?2)",
            params![user_id, channel],
        )
        .map_err(|e| to_storage_err(e.to_string()))? as u64;

    counts.project_interactions = tx
        .execute(
            "DELETE FROM project_interactions
             WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR channel = ?2)",
            params![user_id, channel],
        )
        .map_err(|e| to_storage_err(e.to_string()))? as u64;

    counts.projects = tx
        .execute(
            "DELETE FROM project_contexts
             WHERE (?1 IS NULL OR user_id = ?1)
               AND NOT EXISTS (
                   SELECT 1 FROM project_interactions pi
                   WHERE pi.user_id = project_contexts.user_id
                     AND pi.project_name = project_contexts.project_name
               )",
            params![user_id],
        )
        .map_err(|e| to_storage_err(e.to_string()))? as u64;

    tx.execute(
        "UPDATE project_contexts
         SET last_activity = (
             SELECT MAX(pi.timestamp) FROM project_interactions pi
             WHERE pi.user_id = project_contexts.user_id
               AND pi.project_name = project_contexts.project_name
         )
         WHERE (?1 IS NULL OR user_id = ?1)",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    match (user_id, channel) {
        (Some(user), None) => {
            counts.skills = tx
                .execute("DELETE FROM skill_progressions WHERE user_id = ?1", [user])
                .map_err(|e| to_storage_err(e.to_string()))? as u64;
        }
        (_, Some(channel)) => {
            for mut progression in list_skill_progressions(&tx, user_id)? {
                let pruned = progression.forget_channel(channel);
                if pruned == 0 {
                    continue;
                }
                debug!(
                    user_id = %progression.user_id,
                    skill = %progression.skill,
                    pruned,
                    "pruned skill excerpts"
                );
                if progression.recent_interactions.is_empty() {
                    counts.skills += tx
                        .execute(
                            "DELETE FROM skill_progressions WHERE user_id = ?1 AND skill = ?2",
                            params![progression.user_id, progression.skill],
                        )
                        .map_err(|e| to_storage_err(e.to_string()))?
                        as u64;
                } else {
                    write_progression(&tx, &progression)?;
                }
            }
        }
        (None, None) => {}
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("commit reset: {e}")))?;

    info!(
        user_id = user_id.unwrap_or("*"),
        channel = channel.unwrap_or("*"),
        interactions = counts.interactions,
        project_interactions = counts.project_interactions,
        projects = counts.projects,
        skills = counts.skills,
        "memory reset"
    );
    Ok(counts)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
