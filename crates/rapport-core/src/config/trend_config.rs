//! Trend analyzer settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Offset applied to UTC timestamps before bucketing by hour and weekday.
    pub utc_offset_hours: i32,
    /// Channels whose messages count toward the task-breakdown style.
    pub planning_channels: Vec<String>,
    /// Planning-keyword ratio above which the style is "detailed".
    pub detailed_planning_ratio: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 0,
            planning_channels: vec!["planning".to_string()],
            detailed_planning_ratio: 0.3,
        }
    }
}
