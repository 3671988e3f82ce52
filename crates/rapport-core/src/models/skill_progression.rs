//! Per-user skill progressions, keyed by (user_id, skill).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Complexity, RecentRing};

/// How many recent interactions each skill remembers.
pub const RECENT_SKILL_INTERACTIONS: usize = 10;

/// Which vocabulary a skill came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Programming,
    Framework,
    Technology,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Programming => "programming",
            Self::Framework => "framework",
            Self::Technology => "technology",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "programming" => Some(Self::Programming),
            "framework" => Some(Self::Framework),
            "technology" => Some(Self::Technology),
            _ => None,
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A skill detected in a single interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMention {
    pub skill: String,
    pub category: SkillCategory,
    /// 1/2/3 for simple/medium/complex.
    pub progress_value: u32,
}

/// One entry in a skill's recent-interaction ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillInteraction {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub context: String,
    pub difficulty: Complexity,
}

/// Upsert payload for one skill mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillActivity {
    pub user_id: String,
    pub mention: SkillMention,
    pub entry: SkillInteraction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProgression {
    pub user_id: String,
    pub skill: String,
    pub category: SkillCategory,
    pub interaction_count: u32,
    /// Accumulated progress values, keyed by category name.
    pub level_progress: BTreeMap<String, u32>,
    pub recent_interactions: RecentRing<SkillInteraction, RECENT_SKILL_INTERACTIONS>,
    pub last_updated: DateTime<Utc>,
}

impl SkillProgression {
    pub fn from_activity(activity: &SkillActivity) -> Self {
        let mut progression = Self {
            user_id: activity.user_id.clone(),
            skill: activity.mention.skill.clone(),
            category: activity.mention.category,
            interaction_count: 0,
            level_progress: BTreeMap::new(),
            recent_interactions: RecentRing::new(),
            last_updated: activity.entry.timestamp,
        };
        progression.record(activity);
        progression
    }

    /// Count the mention, accumulate its progress value and remember the entry.
    pub fn record(&mut self, activity: &SkillActivity) {
        self.interaction_count += 1;
        *self
            .level_progress
            .entry(activity.mention.category.as_str().to_string())
            .or_insert(0) += activity.mention.progress_value;
        self.recent_interactions.push(activity.entry.clone());
        if activity.entry.timestamp > self.last_updated {
            self.last_updated = activity.entry.timestamp;
        }
    }

    /// Drop remembered entries from `channel` and back their contribution out of
    /// the count and progress totals. Entries already evicted from the ring are not
    /// known and stay counted. `last_updated` moves to the newest remaining entry.
    /// Returns the number of entries dropped.
    pub fn forget_channel(&mut self, channel: &str) -> usize {
        let (dropped, kept): (Vec<SkillInteraction>, Vec<SkillInteraction>) = self
            .recent_interactions
            .iter()
            .cloned()
            .partition(|entry| entry.channel == channel);
        if dropped.is_empty() {
            return 0;
        }

        let key = self.category.as_str();
        for entry in &dropped {
            self.interaction_count = self.interaction_count.saturating_sub(1);
            if let Some(total) = self.level_progress.get_mut(key) {
                *total = total.saturating_sub(entry.difficulty.score());
            }
        }
        self.recent_interactions = kept.into_iter().collect();
        if let Some(newest) = self.recent_interactions.iter().map(|e| e.timestamp).max() {
            self.last_updated = newest;
        }
        dropped.len()
    }

    /// Difficulty tiers of the remembered interactions, oldest first.
    pub fn difficulties(&self) -> Vec<Complexity> {
        self.recent_interactions.iter().map(|i| i.difficulty).collect()
    }
}
