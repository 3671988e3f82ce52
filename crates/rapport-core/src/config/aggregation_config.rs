//! Read-path window and cap settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Lookback used when a context request does not name one.
    pub default_window_days: u32,
    /// Most recent interactions scanned per request.
    pub max_interactions: usize,
    pub max_projects: usize,
    pub max_skills: usize,
    /// How many preferred languages/frameworks are ranked.
    pub top_preferences: usize,
    /// Idle gap that closes a derived session.
    pub session_gap_minutes: i64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            default_window_days: 14,
            max_interactions: 50,
            max_projects: 5,
            max_skills: 10,
            top_preferences: 3,
            session_gap_minutes: 30,
        }
    }
}
