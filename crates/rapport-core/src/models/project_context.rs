//! Per-user project rollups, keyed by (user_id, project_name).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One interaction attributed to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInteraction {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub response: String,
    pub channel: String,
}

/// Everything known about one of a user's projects. The interaction list only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub user_id: String,
    pub project_name: String,
    pub technologies: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub interactions: Vec<ProjectInteraction>,
    pub last_activity: DateTime<Utc>,
}

impl ProjectContext {
    /// Start a context from its first activity.
    pub fn from_activity(activity: &ProjectActivity) -> Self {
        let mut ctx = Self {
            user_id: activity.user_id.clone(),
            project_name: activity.project_name.clone(),
            technologies: BTreeSet::new(),
            languages: BTreeSet::new(),
            interactions: Vec::new(),
            last_activity: activity.entry.timestamp,
        };
        ctx.apply(activity);
        ctx
    }

    /// Merge an activity: union the tech sets, append the entry, advance last_activity.
    pub fn apply(&mut self, activity: &ProjectActivity) {
        self.technologies.extend(activity.technologies.iter().cloned());
        self.languages.extend(activity.languages.iter().cloned());
        self.interactions.push(activity.entry.clone());
        if activity.entry.timestamp > self.last_activity {
            self.last_activity = activity.entry.timestamp;
        }
    }

    /// Technologies followed by languages, deduplicated.
    pub fn tech_stack(&self) -> Vec<&str> {
        let mut stack: Vec<&str> = self.technologies.iter().map(String::as_str).collect();
        for lang in &self.languages {
            if !self.technologies.contains(lang) {
                stack.push(lang);
            }
        }
        stack
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }
}

/// Upsert payload produced by the write path for one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectActivity {
    pub user_id: String,
    pub project_name: String,
    pub technologies: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub entry: ProjectInteraction,
}
