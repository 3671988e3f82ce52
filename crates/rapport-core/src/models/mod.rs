mod interaction;
mod project_context;
mod recent_ring;
mod reset;
mod skill_progression;

pub use interaction::{
    CodeBlockStats, Complexity, InteractionRecord, InteractionTags, NewInteraction, QuestionType,
};
pub use project_context::{ProjectActivity, ProjectContext, ProjectInteraction};
pub use recent_ring::RecentRing;
pub use reset::{ResetCounts, ResetFilter};
pub use skill_progression::{
    SkillActivity, SkillCategory, SkillInteraction, SkillMention, SkillProgression,
    RECENT_SKILL_INTERACTIONS,
};
