//! # rapport-core
//!
//! Shared foundation for the rapport pattern memory.
//! Typed records for the three stores (interactions, project contexts, skill
//! progressions), the error taxonomy, configuration, and the storage trait the
//! SQLite layer implements.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::RapportConfig;
pub use errors::{RapportError, RapportResult};
pub use models::{
    CodeBlockStats, Complexity, InteractionRecord, InteractionTags, NewInteraction,
    ProjectActivity, ProjectContext, ProjectInteraction, QuestionType, RecentRing, ResetCounts,
    ResetFilter, SkillActivity, SkillCategory, SkillInteraction, SkillMention, SkillProgression,
};
pub use traits::{IPatternStorage, StorageHealth};

/// Channel name used when no interactions exist or none stands out.
pub const DEFAULT_CHANNEL: &str = "general";
