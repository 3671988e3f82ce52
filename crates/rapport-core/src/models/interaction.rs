//! Interaction records and the tags extracted from them.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of question a user message asks.
///
/// Variant order is the classifier's precedence order and the tie-break order
/// when ranking question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    HowTo,
    Debugging,
    CodeReview,
    BestPractices,
    Explanation,
    Optimization,
    Architecture,
    General,
}

impl QuestionType {
    pub const ALL: [QuestionType; 8] = [
        Self::HowTo,
        Self::Debugging,
        Self::CodeReview,
        Self::BestPractices,
        Self::Explanation,
        Self::Optimization,
        Self::Architecture,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HowTo => "how-to",
            Self::Debugging => "debugging",
            Self::CodeReview => "code-review",
            Self::BestPractices => "best-practices",
            Self::Explanation => "explanation",
            Self::Optimization => "optimization",
            Self::Architecture => "architecture",
            Self::General => "general",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complexity tier of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    /// Numeric score used for progress and trend averaging (1..=3).
    pub fn score(&self) -> u32 {
        match self {
            Self::Simple => 1,
            Self::Medium => 2,
            Self::Complex => 3,
        }
    }

    /// Map an averaged score back to a tier.
    pub fn from_average(avg: f64) -> Self {
        if avg < 1.5 {
            Self::Simple
        } else if avg < 2.5 {
            Self::Medium
        } else {
            Self::Complex
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fenced and inline code counts for one interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockStats {
    pub blocks: u32,
    pub inline: u32,
    pub has_code: bool,
}

/// Structured tags derived from interaction text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionTags {
    pub languages: BTreeSet<String>,
    pub frameworks: BTreeSet<String>,
    pub technologies: BTreeSet<String>,
    pub code_blocks: CodeBlockStats,
    pub question_type: QuestionType,
    pub complexity: Complexity,
    pub is_project_related: bool,
}

impl Default for InteractionTags {
    fn default() -> Self {
        Self {
            languages: BTreeSet::new(),
            frameworks: BTreeSet::new(),
            technologies: BTreeSet::new(),
            code_blocks: CodeBlockStats::default(),
            question_type: QuestionType::General,
            complexity: Complexity::Simple,
            is_project_related: false,
        }
    }
}

/// A persisted, tagged user message / response pair. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: String,
    pub user_id: String,
    pub channel: String,
    pub user_text: String,
    pub response_text: String,
    pub tags: InteractionTags,
    pub timestamp: DateTime<Utc>,
}

/// What the chat layer hands to the write path. Missing texts are treated as empty
/// and a missing timestamp as "now".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInteraction {
    pub user_id: String,
    pub channel: String,
    pub user_text: Option<String>,
    pub response_text: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewInteraction {
    pub fn new(
        user_id: impl Into<String>,
        channel: impl Into<String>,
        user_text: impl Into<String>,
        response_text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            channel: channel.into(),
            user_text: Some(user_text.into()),
            response_text: Some(response_text.into()),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
