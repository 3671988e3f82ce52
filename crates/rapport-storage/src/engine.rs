//! SqlitePatternStorage: owns the ConnectionPool and implements IPatternStorage.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use rapport_core::traits::{IPatternStorage, StorageHealth};
use rapport_core::{
    InteractionRecord, ProjectActivity, ProjectContext, RapportResult, ResetCounts, ResetFilter,
    SkillActivity, SkillProgression,
};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{interaction_ops, maintenance_ops, project_ops, skill_ops};

/// SQLite-backed pattern storage. Writes go through the single writer,
/// reads round-robin over the reader pool.
pub struct SqlitePatternStorage {
    pool: ConnectionPool,
}

impl SqlitePatternStorage {
    /// Open (or create) a file-backed store and bring its schema up to date.
    pub fn open(path: &Path, read_pool_size: usize) -> RapportResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let applied = pool.with_writer(migrations::run_migrations)?;
        info!(path = %path.display(), applied, "pattern storage opened");
        Ok(Self { pool })
    }

    pub fn open_in_memory() -> RapportResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        pool.with_writer(migrations::run_migrations)?;
        debug!("in-memory pattern storage opened");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// One project with all its entries, regardless of window.
    pub fn get_project_context(
        &self,
        user_id: &str,
        project_name: &str,
    ) -> RapportResult<Option<ProjectContext>> {
        self.pool
            .with_reader(|conn| project_ops::get_project_context(conn, user_id, project_name))
    }

    pub fn get_skill_progression(
        &self,
        user_id: &str,
        skill: &str,
    ) -> RapportResult<Option<SkillProgression>> {
        self.pool
            .with_reader(|conn| skill_ops::get_skill_progression(conn, user_id, skill))
    }
}

impl IPatternStorage for SqlitePatternStorage {
    fn insert_interaction(&self, record: &InteractionRecord) -> RapportResult<()> {
        self.pool
            .with_writer(|conn| interaction_ops::insert_interaction(conn, record))
    }

    fn upsert_project_context(&self, activity: &ProjectActivity) -> RapportResult<()> {
        self.pool
            .with_writer(|conn| project_ops::upsert_project_context(conn, activity))
    }

    fn upsert_skill_progression(&self, activity: &SkillActivity) -> RapportResult<()> {
        self.pool
            .with_writer(|conn| skill_ops::upsert_skill_progression(conn, activity))
    }

    fn query_interactions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<InteractionRecord>> {
        self.pool
            .with_reader(|conn| interaction_ops::query_interactions(conn, user_id, since, limit))
    }

    fn query_project_contexts(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<ProjectContext>> {
        self.pool
            .with_reader(|conn| project_ops::query_project_contexts(conn, user_id, since, limit))
    }

    fn query_skill_progressions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RapportResult<Vec<SkillProgression>> {
        self.pool
            .with_reader(|conn| skill_ops::query_skill_progressions(conn, user_id, since, limit))
    }

    fn count_interactions(&self, user_id: &str) -> RapportResult<u64> {
        self.pool
            .with_reader(|conn| interaction_ops::count_interactions(conn, user_id))
    }

    fn delete_memory(&self, filter: &ResetFilter) -> RapportResult<ResetCounts> {
        self.pool
            .with_writer(|conn| maintenance_ops::delete_memory(conn, filter))
    }

    fn health_check(&self) -> RapportResult<StorageHealth> {
        let schema_version = self.pool.with_writer(migrations::current_version)?;
        Ok(StorageHealth {
            connected: true,
            wal_mode: self.pool.is_wal_mode(),
            schema_version,
        })
    }
}
