use rapport_core::{InteractionTags, SkillMention};

use crate::vocabulary::Vocabulary;

/// One mention per detected language, framework and technology, in that order.
pub fn derive_skills(tags: &InteractionTags) -> Vec<SkillMention> {
    let progress_value = tags.complexity.score();
    let groups = [
        (Vocabulary::Languages, &tags.languages),
        (Vocabulary::Frameworks, &tags.frameworks),
        (Vocabulary::Technologies, &tags.technologies),
    ];
    groups
        .into_iter()
        .flat_map(|(vocab, terms)| {
            terms.iter().map(move |skill| SkillMention {
                skill: skill.clone(),
                category: vocab.category(),
                progress_value,
            })
        })
        .collect()
}
