//! PatternMemory: the write path and the context read path over one storage.
//!
//! Writes never fail the caller: each of the three persistence operations is
//! attempted independently, and failures are logged and counted in the outcome.
//! Reads degrade to an empty context on storage failure.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rapport_core::traits::StorageHealth;
use rapport_core::{
    IPatternStorage, InteractionRecord, InteractionTags, NewInteraction, ProjectActivity,
    ProjectInteraction, RapportConfig, RapportResult, ResetCounts, ResetFilter, SkillActivity,
    SkillInteraction, DEFAULT_CHANNEL,
};
use rapport_extract::TagExtractor;
use rapport_storage::SqlitePatternStorage;

use crate::aggregation::{self, AggregateResult};
use crate::cache::{CachedContext, ContextCache, ContextKey};
use crate::summary;
use crate::trends::{self, TrendReport};

/// What happened to each of the three writes for one interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOutcome {
    /// Empty when the interaction was rejected before any write.
    pub interaction_id: String,
    pub interaction_stored: bool,
    pub project_name: Option<String>,
    pub project_stored: bool,
    pub skills_stored: usize,
    pub failures: usize,
}

impl StoreOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRequest {
    pub user_id: String,
    pub channel_type: String,
    pub current_message: Option<String>,
    /// Falls back to the configured default window.
    pub lookback_days: Option<u32>,
}

impl ContextRequest {
    pub fn new(user_id: impl Into<String>, channel_type: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            channel_type: channel_type.into(),
            current_message: None,
            lookback_days: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.current_message = Some(message.into());
        self
    }

    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = Some(days);
        self
    }
}

/// Digest plus the structures it was compiled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub summary: String,
    pub aggregates: AggregateResult,
    pub trends: TrendReport,
    /// Tags of the current message, when one was supplied.
    pub current_tags: Option<InteractionTags>,
}

pub struct PatternMemory {
    storage: Arc<dyn IPatternStorage>,
    extractor: TagExtractor,
    cache: ContextCache,
    config: RapportConfig,
}

impl PatternMemory {
    pub fn new(storage: Arc<dyn IPatternStorage>, config: RapportConfig) -> Self {
        let cache = ContextCache::new(&config.cache);
        Self::with_cache(storage, config, cache)
    }

    pub fn with_cache(
        storage: Arc<dyn IPatternStorage>,
        config: RapportConfig,
        cache: ContextCache,
    ) -> Self {
        Self {
            storage,
            extractor: TagExtractor::new(&config.extraction),
            cache,
            config,
        }
    }

    /// Open SQLite storage per `config.storage` (in-memory when no path is set).
    pub fn open(config: RapportConfig) -> RapportResult<Self> {
        let storage = match &config.storage.db_path {
            Some(path) => {
                SqlitePatternStorage::open(Path::new(path), config.storage.read_pool_size)?
            }
            None => SqlitePatternStorage::open_in_memory()?,
        };
        info!(
            db_path = config.storage.db_path.as_deref().unwrap_or(":memory:"),
            cache = config.cache.enabled,
            "pattern memory ready"
        );
        Ok(Self::new(Arc::new(storage), config))
    }

    pub fn config(&self) -> &RapportConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn IPatternStorage> {
        &self.storage
    }

    pub fn cache(&self) -> &ContextCache {
        &self.cache
    }

    // ── Write path ──

    /// Tag and persist one interaction, then upsert its project and skills.
    pub fn store_interaction(&self, interaction: NewInteraction) -> StoreOutcome {
        let mut outcome = StoreOutcome::default();

        let user_id = interaction.user_id.trim().to_string();
        if user_id.is_empty() {
            warn!("interaction without user_id dropped");
            outcome.failures = 1;
            return outcome;
        }
        let channel = match interaction.channel.trim() {
            "" => DEFAULT_CHANNEL.to_string(),
            c => c.to_string(),
        };
        let user_text = interaction.user_text.unwrap_or_default();
        let response_text = interaction.response_text.unwrap_or_default();
        let timestamp = interaction.timestamp.unwrap_or_else(Utc::now);

        let extraction = self.extractor.extract(&user_text, &response_text);
        let limits = &self.config.extraction;

        let record = InteractionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            channel: channel.clone(),
            user_text: user_text.clone(),
            response_text: response_text.clone(),
            tags: extraction.tags.clone(),
            timestamp,
        };
        outcome.interaction_id = record.id.clone();
        match self.storage.insert_interaction(&record) {
            Ok(()) => outcome.interaction_stored = true,
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "failed to store interaction");
                outcome.failures += 1;
            }
        }

        if let Some(project_name) = &extraction.project_name {
            let activity = ProjectActivity {
                user_id: user_id.clone(),
                project_name: project_name.clone(),
                technologies: extraction.tags.technologies.clone(),
                languages: extraction.tags.languages.clone(),
                entry: ProjectInteraction {
                    timestamp,
                    message: excerpt(&user_text, limits.project_excerpt_chars),
                    response: excerpt(&response_text, limits.project_excerpt_chars),
                    channel: channel.clone(),
                },
            };
            outcome.project_name = Some(project_name.clone());
            match self.storage.upsert_project_context(&activity) {
                Ok(()) => outcome.project_stored = true,
                Err(e) => {
                    warn!(error = %e, user_id = %user_id, project = %project_name, "failed to update project context");
                    outcome.failures += 1;
                }
            }
        }

        for mention in &extraction.skills {
            let activity = SkillActivity {
                user_id: user_id.clone(),
                mention: mention.clone(),
                entry: SkillInteraction {
                    timestamp,
                    channel: channel.clone(),
                    context: excerpt(&user_text, limits.skill_context_chars),
                    difficulty: extraction.tags.complexity,
                },
            };
            match self.storage.upsert_skill_progression(&activity) {
                Ok(()) => outcome.skills_stored += 1,
                Err(e) => {
                    warn!(error = %e, user_id = %user_id, skill = %mention.skill, "failed to update skill progression");
                    outcome.failures += 1;
                }
            }
        }

        if outcome.interaction_stored || outcome.project_stored || outcome.skills_stored > 0 {
            self.cache.invalidate_user(&user_id);
        }

        debug!(
            user_id = %user_id,
            channel = %channel,
            question_type = %extraction.tags.question_type,
            complexity = %extraction.tags.complexity,
            skills = outcome.skills_stored,
            failures = outcome.failures,
            "interaction stored"
        );
        outcome
    }

    // ── Read path ──

    /// Aggregate a window ending now. Never fails.
    pub fn aggregate(&self, user_id: &str, channel_type: &str, window_days: u32) -> AggregateResult {
        aggregation::aggregate(
            self.storage.as_ref(),
            &self.config.aggregation,
            user_id,
            channel_type,
            window_days,
            Utc::now(),
        )
    }

    /// Build the context bundle for a window ending now, reading through the cache.
    pub fn build_context(&self, request: &ContextRequest) -> ContextBundle {
        let window_days = self.window_days(request);
        let key = ContextKey::new(&request.user_id, &request.channel_type, window_days);
        let cached = match self.cache.get(&key) {
            Some(hit) => {
                debug!(user_id = %request.user_id, window_days, "context cache hit");
                hit
            }
            None => self.compute_context(request, Some(key), window_days, Utc::now()),
        };
        self.assemble(request, &cached)
    }

    /// Build the context bundle for a window ending at `now`. Bypasses the cache.
    pub fn build_context_at(&self, request: &ContextRequest, now: DateTime<Utc>) -> ContextBundle {
        let window_days = self.window_days(request);
        let computed = self.compute_context(request, None, window_days, now);
        self.assemble(request, &computed)
    }

    fn window_days(&self, request: &ContextRequest) -> u32 {
        request
            .lookback_days
            .unwrap_or(self.config.aggregation.default_window_days)
    }

    fn assemble(&self, request: &ContextRequest, cached: &CachedContext) -> ContextBundle {
        let mut aggregates = cached.aggregates.clone();
        let trends = cached.trends.clone();

        let current_tags = request.current_message.as_deref().map(|message| {
            let extraction = self.extractor.extract(message, "");
            if let Some(name) = &extraction.project_name {
                promote_project(&mut aggregates, name);
            }
            extraction.tags
        });

        let summary = summary::compile(&aggregates, &trends, &self.config.summary);
        ContextBundle {
            summary,
            aggregates,
            trends,
            current_tags,
        }
    }

    /// Aggregate and analyze; stores the result under `key` when one is given.
    fn compute_context(
        &self,
        request: &ContextRequest,
        key: Option<ContextKey>,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Arc<CachedContext> {
        match aggregation::try_aggregate(
            self.storage.as_ref(),
            &self.config.aggregation,
            &request.user_id,
            &request.channel_type,
            window_days,
            now,
        ) {
            Ok(aggregates) => {
                let trends = trends::analyze(&aggregates, &self.config.trends);
                let context = CachedContext { aggregates, trends };
                match key {
                    Some(key) => self.cache.insert(key, context),
                    None => Arc::new(context),
                }
            }
            Err(e) => {
                // Failures are not cached so the next request retries storage.
                warn!(error = %e, user_id = %request.user_id, "context aggregation failed, using empty context");
                let aggregates = AggregateResult::empty(
                    &request.user_id,
                    &request.channel_type,
                    window_days,
                    aggregation::window_start(now, window_days),
                );
                let trends = trends::analyze(&aggregates, &self.config.trends);
                Arc::new(CachedContext { aggregates, trends })
            }
        }
    }

    // ── Administration ──

    /// Hard delete scoped by the filter. Invalidates affected cached contexts.
    pub fn reset_memory(&self, filter: &ResetFilter) -> RapportResult<ResetCounts> {
        filter.validate()?;
        let counts = self.storage.delete_memory(filter)?;
        match (&filter.user_id, &filter.channel) {
            (Some(user_id), None) => self.cache.invalidate_user(user_id),
            _ => self.cache.clear(),
        }
        Ok(counts)
    }

    pub fn count_interactions(&self, user_id: &str) -> RapportResult<u64> {
        self.storage.count_interactions(user_id)
    }

    pub fn health_check(&self) -> RapportResult<StorageHealth> {
        self.storage.health_check()
    }
}

/// Move the named project (case-insensitive) to the front, keeping the rest in order.
fn promote_project(aggregates: &mut AggregateResult, name: &str) {
    if let Some(pos) = aggregates
        .projects
        .iter()
        .position(|p| p.project_name.eq_ignore_ascii_case(name))
    {
        let project = aggregates.projects.remove(pos);
        aggregates.projects.insert(0, project);
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
