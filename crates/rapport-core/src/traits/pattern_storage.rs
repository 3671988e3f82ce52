//! `IPatternStorage`: persistence interface over the three pattern stores.
//!
//! Writes are append (interactions) or keyed upsert (projects, skills), so calls for
//! different users never interfere and repeated calls for the same key commute.
//! Reads are point-in-time snapshots with no isolation against concurrent writes.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::RapportResult;
use crate::models::{
    InteractionRecord, ProjectActivity, ProjectContext, ResetCounts, ResetFilter, SkillActivity,
    SkillProgression,
};

/// Health status of the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageHealth {
    pub connected: bool,
    pub wal_mode: bool,
    pub schema_version: u32,
}

/// Abstraction over interaction, project-context and skill-progression storage.
pub trait IPatternStorage: Send + Sync {
    // ── Writes ──

    /// Append one tagged interaction.
    fn insert_interaction(&self, record: &InteractionRecord) -> RapportResult<()>;

    /// Create or extend the (user, project) context.
    fn upsert_project_context(&self, activity: &ProjectActivity) -> RapportResult<()>;

    /// Create or extend the (user, skill) progression.
    fn upsert_skill_progression(&self, activity: &SkillActivity) -> RapportResult<()>;

    // ── Reads ──

    /// Interactions at or after `since`, newest first.
    fn query_interactions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<InteractionRecord>>;

    /// Projects active at or after `since`, most recent first.
    fn query_project_contexts(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<ProjectContext>>;

    /// Skills updated at or after `since`, most recent first.
    fn query_skill_progressions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<SkillProgression>>;

    fn count_interactions(&self, user_id: &str) -> RapportResult<u64>;

    // ── Lifecycle ──

    /// Hard delete scoped by the filter.
    fn delete_memory(&self, filter: &ResetFilter) -> RapportResult<ResetCounts>;

    fn health_check(&self) -> RapportResult<StorageHealth>;
}

impl<T: IPatternStorage + ?Sized> IPatternStorage for Arc<T> {
    fn insert_interaction(&self, record: &InteractionRecord) -> RapportResult<()> {
        (**self).insert_interaction(record)
    }
    fn upsert_project_context(&self, activity: &ProjectActivity) -> RapportResult<()> {
        (**self).upsert_project_context(activity)
    }
    fn upsert_skill_progression(&self, activity: &SkillActivity) -> RapportResult<()> {
        (**self).upsert_skill_progression(activity)
    }
    fn query_interactions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<InteractionRecord>> {
        (**self).query_interactions(user_id, since, limit)
    }
    fn query_project_contexts(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<ProjectContext>> {
        (**self).query_project_contexts(user_id, since, limit)
    }
    fn query_skill_progressions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<SkillProgression>> {
        (**self).query_skill_progressions(user_id, since, limit)
    }
    fn count_interactions(&self, user_id: &str) -> RapportResult<u64> {
        (**self).count_interactions(user_id)
    }
    fn delete_memory(&self, filter: &ResetFilter) -> RapportResult<ResetCounts> {
        (**self).delete_memory(filter)
    }
    fn health_check(&self) -> RapportResult<StorageHealth> {
        (**self).health_check()
    }
}
