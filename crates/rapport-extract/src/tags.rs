//! `TagExtractor`: one pass over an interaction's texts.

use rapport_core::config::ExtractionConfig;
use rapport_core::{InteractionTags, SkillMention};

use crate::code_blocks::count_code_blocks;
use crate::complexity::assess_complexity;
use crate::project_name::{extract_project_name, DEFAULT_MAX_CHARS};
use crate::question::classify_question_type;
use crate::skills::derive_skills;
use crate::vocabulary::{detect, Vocabulary};

/// Everything extracted from one user message / response pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub tags: InteractionTags,
    pub project_name: Option<String>,
    pub skills: Vec<SkillMention>,
}

/// Configured extractor. Cheap to clone; holds only limits.
#[derive(Debug, Clone)]
pub struct TagExtractor {
    project_name_max_chars: usize,
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self {
            project_name_max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl TagExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            project_name_max_chars: config.project_name_max_chars,
        }
    }

    /// Tag an interaction. Code is counted over both texts; everything else reads
    /// only the user's message.
    pub fn extract(&self, user_text: &str, response_text: &str) -> Extraction {
        let project_name = self.project_name(user_text);

        let mut code_blocks = count_code_blocks(user_text);
        let response_code = count_code_blocks(response_text);
        code_blocks.blocks += response_code.blocks;
        code_blocks.inline += response_code.inline;
        code_blocks.has_code |= response_code.has_code;

        let tags = InteractionTags {
            languages: detect(user_text, Vocabulary::Languages),
            frameworks: detect(user_text, Vocabulary::Frameworks),
            technologies: detect(user_text, Vocabulary::Technologies),
            code_blocks,
            question_type: classify_question_type(user_text),
            complexity: assess_complexity(user_text),
            is_project_related: project_name.is_some(),
        };
        let skills = derive_skills(&tags);

        Extraction {
            tags,
            project_name,
            skills,
        }
    }

    pub fn project_name(&self, text: &str) -> Option<String> {
        extract_project_name(text, self.project_name_max_chars)
    }
}

/// Tags for an interaction using default limits.
pub fn extract_tags(user_text: &str, response_text: &str) -> InteractionTags {
    TagExtractor::default().extract(user_text, response_text).tags
}
