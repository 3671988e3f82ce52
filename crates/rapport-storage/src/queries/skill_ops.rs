//! Skill progressions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use rapport_core::models::RECENT_SKILL_INTERACTIONS;
use rapport_core::{
    RapportResult, RecentRing, SkillActivity, SkillCategory, SkillInteraction, SkillProgression,
};

use super::{from_millis, sql_limit, to_millis};
use crate::{corrupt_row, to_storage_err};

const TABLE: &str = "skill_progressions";

const SELECT_COLUMNS: &str = "SELECT user_id, skill, category, interaction_count, level_progress,
        recent_interactions, last_updated FROM skill_progressions";

/// Read-modify-write upsert in its own transaction.
pub fn upsert_skill_progression(conn: &Connection, activity: &SkillActivity) -> RapportResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("begin skill upsert: {e}")))?;

    let merged = match get_skill_progression(&tx, &activity.user_id, &activity.mention.skill)? {
        Some(mut existing) => {
            existing.record(activity);
            existing
        }
        None => SkillProgression::from_activity(activity),
    };
    write_progression(&tx, &merged)?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("commit skill upsert: {e}")))
}

pub fn get_skill_progression(
    conn: &Connection,
    user_id: &str,
    skill: &str,
) -> RapportResult<Option<SkillProgression>> {
    let raw = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND skill = ?2"),
            params![user_id, skill],
            raw_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.map(RawSkill::decode).transpose()
}

/// Skills updated at or after `since`, most recent first.
pub fn query_skill_progressions(
    conn: &Connection,
    user_id: &str,
    since: DateTime<Utc>,
    limit: usize,
) -> RapportResult<Vec<SkillProgression>> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 AND last_updated >= ?2
             ORDER BY last_updated DESC, skill ASC LIMIT ?3"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, to_millis(since), sql_limit(limit)], raw_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut skills = Vec::new();
    for row in rows {
        skills.push(row.map_err(|e| to_storage_err(e.to_string()))?.decode()?);
    }
    Ok(skills)
}

/// All progressions for a user, or for everyone when `user_id` is `None`.
pub(crate) fn list_skill_progressions(
    conn: &Connection,
    user_id: Option<&str>,
) -> RapportResult<Vec<SkillProgression>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} WHERE (?1 IS NULL OR user_id = ?1)"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id], raw_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut skills = Vec::new();
    for row in rows {
        skills.push(row.map_err(|e| to_storage_err(e.to_string()))?.decode()?);
    }
    Ok(skills)
}

pub(crate) fn write_progression(conn: &Connection, p: &SkillProgression) -> RapportResult<()> {
    let level_progress =
        serde_json::to_string(&p.level_progress).map_err(|e| to_storage_err(e.to_string()))?;
    let recent =
        serde_json::to_string(&p.recent_interactions).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO skill_progressions (
            user_id, skill, category, interaction_count, level_progress,
            recent_interactions, last_updated
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (user_id, skill) DO UPDATE SET
            category = excluded.category,
            interaction_count = excluded.interaction_count,
            level_progress = excluded.level_progress,
            recent_interactions = excluded.recent_interactions,
            last_updated = excluded.last_updated",
        params![
            p.user_id,
            p.skill,
            p.category.as_str(),
            p.interaction_count,
            level_progress,
            recent,
            to_millis(p.last_updated),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

struct RawSkill {
    user_id: String,
    skill: String,
    category: String,
    interaction_count: u32,
    level_progress: String,
    recent_interactions: String,
    last_updated: i64,
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawSkill> {
    Ok(RawSkill {
        user_id: row.get(0)?,
        skill: row.get(1)?,
        category: row.get(2)?,
        interaction_count: row.get(3)?,
        level_progress: row.get(4)?,
        recent_interactions: row.get(5)?,
        last_updated: row.get(6)?,
    })
}

impl RawSkill {
    fn decode(self) -> RapportResult<SkillProgression> {
        let category = SkillCategory::parse(&self.category)
            .ok_or_else(|| corrupt_row(TABLE, format!("unknown category {:?}", self.category)))?;
        let level_progress: BTreeMap<String, u32> =
            serde_json::from_str(&self.level_progress).map_err(|e| corrupt_row(TABLE, e))?;
        let recent_interactions: RecentRing<SkillInteraction, RECENT_SKILL_INTERACTIONS> =
            serde_json::from_str(&self.recent_interactions).map_err(|e| corrupt_row(TABLE, e))?;
        Ok(SkillProgression {
            user_id: self.user_id,
            skill: self.skill,
            category,
            interaction_count: self.interaction_count,
            level_progress,
            recent_interactions,
            last_updated: from_millis(TABLE, self.last_updated)?,
        })
    }
}
