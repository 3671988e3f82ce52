//! Project contexts and their interaction entries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use rapport_core::{ProjectActivity, ProjectContext, ProjectInteraction, RapportResult};

use super::{from_millis, sql_limit, to_millis};
use crate::{corrupt_row, to_storage_err};

const TABLE: &str = "project_contexts";

/// Read-modify-write upsert: union the tech sets, advance `last_activity`,
/// append one interaction entry. Runs in its own transaction.
pub fn upsert_project_context(conn: &Connection, activity: &ProjectActivity) -> RapportResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("begin project upsert: {e}")))?;

    let merged = match load_header(&tx, &activity.user_id, &activity.project_name)? {
        Some(mut existing) => {
            existing.apply(activity);
            existing
        }
        None => ProjectContext::from_activity(activity),
    };

    let technologies =
        serde_json::to_string(&merged.technologies).map_err(|e| to_storage_err(e.to_string()))?;
    let languages =
        serde_json::to_string(&merged.languages).map_err(|e| to_storage_err(e.to_string()))?;

    tx.execute(
        "INSERT INTO project_contexts (user_id, project_name, technologies, languages, last_activity)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (user_id, project_name) DO UPDATE SET
            technologies = excluded.technologies,
            languages = excluded.languages,
            last_activity = excluded.last_activity",
        params![
            merged.user_id,
            merged.project_name,
            technologies,
            languages,
            to_millis(merged.last_activity),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let entry = &activity.entry;
    tx.execute(
        "INSERT INTO project_interactions (user_id, project_name, timestamp, message, response, channel)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            activity.user_id,
            activity.project_name,
            to_millis(entry.timestamp),
            entry.message,
            entry.response,
            entry.channel,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("commit project upsert: {e}")))
}

/// A single project with all its interaction entries.
pub fn get_project_context(
    conn: &Connection,
    user_id: &str,
    project_name: &str,
) -> RapportResult<Option<ProjectContext>> {
    let Some(mut ctx) = load_header(conn, user_id, project_name)? else {
        return Ok(None);
    };
    ctx.interactions = load_interactions(conn, user_id, project_name)?;
    Ok(Some(ctx))
}

/// Projects active at or after `since`, most recent first.
pub fn query_project_contexts(
    conn: &Connection,
    user_id: &str,
    since: DateTime<Utc>,
    limit: usize,
) -> RapportResult<Vec<ProjectContext>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT project_name, technologies, languages, last_activity
             FROM project_contexts
             WHERE user_id = ?1 AND last_activity >= ?2
             ORDER BY last_activity DESC, project_name ASC
             LIMIT ?3",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, to_millis(since), sql_limit(limit)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut contexts = Vec::new();
    for row in rows {
        let (name, tech, langs, last) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let mut ctx = decode_header(user_id, name, &tech, &langs, last)?;
        ctx.interactions = load_interactions(conn, user_id, &ctx.project_name)?;
        contexts.push(ctx);
    }
    Ok(contexts)
}

fn load_header(
    conn: &Connection,
    user_id: &str,
    project_name: &str,
) -> RapportResult<Option<ProjectContext>> {
    let row = conn
        .query_row(
            "SELECT technologies, languages, last_activity
             FROM project_contexts WHERE user_id = ?1 AND project_name = ?2",
            params![user_id, project_name],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    row.map(|(tech, langs, last)| {
        decode_header(user_id, project_name.to_string(), &tech, &langs, last)
    })
    .transpose()
}

fn decode_header(
    user_id: &str,
    project_name: String,
    technologies: &str,
    languages: &str,
    last_activity: i64,
) -> RapportResult<ProjectContext> {
    let technologies: BTreeSet<String> =
        serde_json::from_str(technologies).map_err(|e| corrupt_row(TABLE, e))?;
    let languages: BTreeSet<String> =
        serde_json::from_str(languages).map_err(|e| corrupt_row(TABLE, e))?;
    Ok(ProjectContext {
        user_id: user_id.to_string(),
        project_name,
        technologies,
        languages,
        interactions: Vec::new(),
        last_activity: from_millis(TABLE, last_activity)?,
    })
}

/// Entries in insertion order.
fn load_interactions(
    conn: &Connection,
    user_id: &str,
    project_name: &str,
) -> RapportResult<Vec<ProjectInteraction>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT timestamp, message, response, channel
             FROM project_interactions
             WHERE user_id = ?1 AND project_name = ?2
             ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, project_name], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entries = Vec::new();
    for row in rows {
        let (ts, message, response, channel) = row.map_err(|e| to_storage_err(e.to_string()))?;
        entries.push(ProjectInteraction {
            timestamp: from_millis("project_interactions", ts)?,
            message,
            response,
            channel,
        });
    }
    Ok(entries)
}
