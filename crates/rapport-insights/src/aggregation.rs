//! Context aggregation over a user's lookback window.
//!
//! Scans the newest interactions in the window and builds frequency tables,
//! preference rankings and per-entity rollups. Every tie is broken explicitly:
//! vocabulary declaration order for languages/frameworks, channel name for the
//! most active channel, `QuestionType` declaration order for question types.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rapport_core::config::AggregationConfig;
use rapport_core::{
    Complexity, IPatternStorage, InteractionRecord, ProjectContext, QuestionType, RapportResult,
    SkillProgression, DEFAULT_CHANNEL,
};
use rapport_extract::Vocabulary;

use crate::sessions::{derive_sessions, SessionSnapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityDistribution {
    pub simple: u32,
    pub medium: u32,
    pub complex: u32,
}

impl ComplexityDistribution {
    pub fn record(&mut self, complexity: Complexity) {
        match complexity {
            Complexity::Simple => self.simple += 1,
            Complexity::Medium => self.medium += 1,
            Complexity::Complex => self.complex += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.simple + self.medium + self.complex
    }

    /// Fraction of complex interactions, 0.0 when empty.
    pub fn complex_share(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.complex) / f64::from(total),
        }
    }
}

/// Everything the trend analyzer and summary compiler need about one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub user_id: String,
    pub channel_type: String,
    pub window_days: u32,
    pub since: DateTime<Utc>,
    /// Scanned interactions, newest first.
    pub interactions: Vec<InteractionRecord>,
    pub channel_counts: BTreeMap<String, u32>,
    pub language_counts: BTreeMap<String, u32>,
    pub framework_counts: BTreeMap<String, u32>,
    pub question_type_counts: BTreeMap<QuestionType, u32>,
    pub complexity: ComplexityDistribution,
    pub preferred_languages: Vec<String>,
    pub preferred_frameworks: Vec<String>,
    pub most_active_channel: String,
    pub dominant_question_types: Vec<QuestionType>,
    /// Most recently active first.
    pub projects: Vec<ProjectContext>,
    /// Most recently updated first.
    pub skills: Vec<SkillProgression>,
    /// Oldest first.
    pub sessions: Vec<SessionSnapshot>,
}

impl AggregateResult {
    /// Neutral result: no data, `general` channel.
    pub fn empty(user_id: &str, channel_type: &str, window_days: u32, since: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            channel_type: channel_type.to_string(),
            window_days,
            since,
            interactions: Vec::new(),
            channel_counts: BTreeMap::new(),
            language_counts: BTreeMap::new(),
            framework_counts: BTreeMap::new(),
            question_type_counts: BTreeMap::new(),
            complexity: ComplexityDistribution::default(),
            preferred_languages: Vec::new(),
            preferred_frameworks: Vec::new(),
            most_active_channel: DEFAULT_CHANNEL.to_string(),
            dominant_question_types: Vec::new(),
            projects: Vec::new(),
            skills: Vec::new(),
            sessions: Vec::new(),
        }
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    pub fn latest_session(&self) -> Option<&SessionSnapshot> {
        self.sessions.last()
    }
}

/// Question types reported as dominant.
const DOMINANT_QUESTION_TYPES: usize = 2;

/// Aggregate a user's window. Storage failures degrade to `AggregateResult::empty`.
pub fn aggregate(
    storage: &dyn IPatternStorage,
    config: &AggregationConfig,
    user_id: &str,
    channel_type: &str,
    window_days: u32,
    now: DateTime<Utc>,
) -> AggregateResult {
    try_aggregate(storage, config, user_id, channel_type, window_days, now).unwrap_or_else(|e| {
        warn!(error = %e, user_id, window_days, "aggregation failed, using empty context");
        AggregateResult::empty(user_id, channel_type, window_days, window_start(now, window_days))
    })
}

/// Like `aggregate`, but surfaces storage failures.
pub fn try_aggregate(
    storage: &dyn IPatternStorage,
    config: &AggregationConfig,
    user_id: &str,
    channel_type: &str,
    window_days: u32,
    now: DateTime<Utc>,
) -> RapportResult<AggregateResult> {
    let since = window_start(now, window_days);
    let interactions = storage.query_interactions(user_id, since, config.max_interactions)?;
    let projects = storage.query_project_contexts(user_id, since, config.max_projects)?;
    let skills = storage.query_skill_progressions(user_id, since, config.max_skills)?;

    let mut result = summarize_window(config, user_id, channel_type, window_days, since, interactions);
    result.projects = projects;
    result.skills = skills;
    debug!(
        user_id,
        window_days,
        interactions = result.interaction_count(),
        projects = result.projects.len(),
        skills = result.skills.len(),
        "aggregated context"
    );
    Ok(result)
}

/// Start of a `window_days` window ending at `now`. Windows reaching past the
/// representable range start at `DateTime::MIN_UTC`.
pub fn window_start(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(window_days))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Build the interaction-derived part of an aggregate. Projects and skills are left empty.
pub fn summarize_window(
    config: &AggregationConfig,
    user_id: &str,
    channel_type: &str,
    window_days: u32,
    since: DateTime<Utc>,
    mut interactions: Vec<InteractionRecord>,
) -> AggregateResult {
    interactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    interactions.truncate(config.max_interactions);

    let mut result = AggregateResult::empty(user_id, channel_type, window_days, since);

    for record in &interactions {
        *result.channel_counts.entry(record.channel.clone()).or_default() += 1;
        for lang in &record.tags.languages {
            *result.language_counts.entry(lang.clone()).or_default() += 1;
        }
        for fw in &record.tags.frameworks {
            *result.framework_counts.entry(fw.clone()).or_default() += 1;
        }
        *result
            .question_type_counts
            .entry(record.tags.question_type)
            .or_default() += 1;
        result.complexity.record(record.tags.complexity);
    }

    result.preferred_languages = rank_terms(
        &result.language_counts,
        Vocabulary::Languages,
        config.top_preferences,
    );
    result.preferred_frameworks = rank_terms(
        &result.framework_counts,
        Vocabulary::Frameworks,
        config.top_preferences,
    );
    result.most_active_channel = most_active_channel(&result.channel_counts);
    result.dominant_question_types =
        rank_question_types(&result.question_type_counts, DOMINANT_QUESTION_TYPES);
    result.sessions = derive_sessions(
        &interactions,
        Duration::minutes(config.session_gap_minutes),
    );
    result.interactions = interactions;
    result
}

/// Top `n` terms by descending count, ties by vocabulary declaration order.
pub fn rank_terms(counts: &BTreeMap<String, u32>, vocabulary: Vocabulary, n: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, u32)> = counts.iter().map(|(t, c)| (t, *c)).collect();
    ranked.sort_by(|(a, ca), (b, cb)| {
        cb.cmp(ca)
            .then_with(|| {
                let ra = vocabulary.rank(a).unwrap_or(usize::MAX);
                let rb = vocabulary.rank(b).unwrap_or(usize::MAX);
                ra.cmp(&rb)
            })
            .then_with(|| a.cmp(b))
    });
    ranked.into_iter().take(n).map(|(t, _)| t.clone()).collect()
}

/// Highest count, ties by channel name; `general` when there is nothing.
pub fn most_active_channel(counts: &BTreeMap<String, u32>) -> String {
    counts
        .iter()
        .rev()
        .max_by_key(|(_, count)| **count)
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| DEFAULT_CHANNEL.to_string())
}

fn rank_question_types(counts: &BTreeMap<QuestionType, u32>, n: usize) -> Vec<QuestionType> {
    let mut ranked: Vec<(QuestionType, u32)> = counts.iter().map(|(q, c)| (*q, *c)).collect();
    ranked.sort_by(|(qa, ca), (qb, cb)| cb.cmp(ca).then_with(|| qa.cmp(qb)));
    ranked.into_iter().take(n).map(|(q, _)| q).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn ties_follow_vocabulary_order() {
        let c = counts(&[("rust", 2), ("python", 2), ("javascript", 1), ("css", 2)]);
        assert_eq!(
            rank_terms(&c, Vocabulary::Languages, 3),
            vec!["python", "rust", "css"]
        );
    }

    #[test]
    fn most_active_channel_breaks_ties_by_name() {
        assert_eq!(most_active_channel(&BTreeMap::new()), "general");
        let c = counts(&[("planning", 3), ("debugging", 3), ("general", 1)]);
        assert_eq!(most_active_channel(&c), "debugging");
    }

    #[test]
    fn question_types_rank_by_count_then_declaration() {
        let c: BTreeMap<QuestionType, u32> = [
            (QuestionType::General, 4),
            (QuestionType::Architecture, 2),
            (QuestionType::HowTo, 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            rank_question_types(&c, 2),
            vec![QuestionType::General, QuestionType::HowTo]
        );
    }

    #[test]
    fn oversized_window_clamps_to_earliest_instant() {
        let now = Utc::now();
        assert_eq!(window_start(now, u32::MAX), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now, 14), now - Duration::days(14));
        assert_eq!(window_start(now, 0), now);
    }

    #[test]
    fn complex_share_handles_empty() {
        let mut d = ComplexityDistribution::default();
        assert_eq!(d.complex_share(), 0.0);
        d.record(Complexity::Complex);
        d.record(Complexity::Simple);
        assert!((d.complex_share() - 0.5).abs() < f64::EPSILON);
    }
}
