//! Append-only interaction log.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use rapport_core::{InteractionRecord, InteractionTags, RapportResult};

use super::{from_millis, sql_limit, to_millis};
use crate::{corrupt_row, to_storage_err};

const TABLE: &str = "interactions";

pub fn insert_interaction(conn: &Connection, record: &InteractionRecord) -> RapportResult<()> {
    let tags_json =
        serde_json::to_string(&record.tags).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO interactions (
            id, user_id, channel, user_text, response_text, tags, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.id,
            record.user_id,
            record.channel,
            record.user_text,
            record.response_text,
            tags_json,
            to_millis(record.timestamp),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Interactions for a user at or after `since`, newest first.
pub fn query_interactions(
    conn: &Connection,
    user_id: &str,
    since: DateTime<Utc>,
    limit: usize,
) -> RapportResult<Vec<InteractionRecord>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, user_id, channel, user_text, response_text, tags, created_at
             FROM interactions
             WHERE user_id = ?1 AND created_at >= ?2
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?3",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, to_millis(since), sql_limit(limit)], raw_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        records.push(raw.decode()?);
    }
    Ok(records)
}

pub fn count_interactions(conn: &Connection, user_id: &str) -> RapportResult<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM interactions WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as u64)
}

/// Column values before JSON/timestamp decoding, so decode errors surface as
/// `CorruptRow` instead of a generic rusqlite conversion failure.
struct RawInteraction {
    id: String,
    user_id: String,
    channel: String,
    user_text: String,
    response_text: String,
    tags: String,
    created_at: i64,
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawInteraction> {
    Ok(RawInteraction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        channel: row.get(2)?,
        user_text: row.get(3)?,
        response_text: row.get(4)?,
        tags: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl RawInteraction {
    fn decode(self) -> RapportResult<InteractionRecord> {
        let tags: InteractionTags =
            serde_json::from_str(&self.tags).map_err(|e| corrupt_row(TABLE, e))?;
        Ok(InteractionRecord {
            id: self.id,
            user_id: self.user_id,
            channel: self.channel,
            user_text: self.user_text,
            response_text: self.response_text,
            tags,
            timestamp: from_millis(TABLE, self.created_at)?,
        })
    }
}
