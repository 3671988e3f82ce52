//! Summary compiler settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Hard upper bound on the compiled digest, in characters.
    pub max_chars: usize,
    /// Complex share of interactions above which a complexity preference is reported.
    pub complex_share_threshold: f64,
    pub fallback_text: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chars: 1500,
            complex_share_threshold: 0.4,
            fallback_text: "No significant user patterns detected yet.".to_string(),
        }
    }
}
