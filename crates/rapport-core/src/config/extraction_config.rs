//! Tag extraction and write-path excerpt limits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extracted project names are truncated to this many characters.
    pub project_name_max_chars: usize,
    /// Length of the message excerpt kept in a skill's recent interactions.
    pub skill_context_chars: usize,
    /// Length of the message/response excerpts kept per project interaction.
    pub project_excerpt_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            project_name_max_chars: 50,
            skill_context_chars: 100,
            project_excerpt_chars: 500,
        }
    }
}
