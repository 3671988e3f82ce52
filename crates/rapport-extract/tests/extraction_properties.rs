//! Property-based tests for the tag extractor.

use proptest::prelude::*;

use rapport_extract::vocabulary::{LANGUAGES, TECHNOLOGIES};
use rapport_extract::{
    count_code_blocks, detect, extract_project_name, extract_tags, TagExtractor, Vocabulary,
};

fn arb_language() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(LANGUAGES.to_vec())
}

proptest! {
    #[test]
    fn extraction_is_total(user in ".{0,300}", response in ".{0,300}") {
        let extraction = TagExtractor::default().extract(&user, &response);
        prop_assert_eq!(extraction.tags.is_project_related, extraction.project_name.is_some());
        prop_assert_eq!(
            extraction.skills.len(),
            extraction.tags.languages.len()
                + extraction.tags.frameworks.len()
                + extraction.tags.technologies.len()
        );
    }

    #[test]
    fn detection_ignores_case(text in "[a-zA-Z +#.]{0,120}") {
        for vocab in Vocabulary::ALL {
            prop_assert_eq!(detect(&text, vocab), detect(&text.to_uppercase(), vocab));
        }
    }

    #[test]
    fn repeating_text_detects_the_same_set(text in "[a-z +#.]{0,80}", n in 1usize..4) {
        let repeated = vec![text.as_str(); n].join(" ");
        for vocab in Vocabulary::ALL {
            prop_assert_eq!(detect(&text, vocab), detect(&repeated, vocab));
        }
    }

    #[test]
    fn standalone_language_is_detected(lang in arb_language()) {
        let text = format!("question about {lang} please");
        prop_assert!(detect(&text, Vocabulary::Languages).contains(lang));
    }

    #[test]
    fn standalone_technology_is_detected(tech in proptest::sample::select(TECHNOLOGIES.to_vec())) {
        let text = format!("deploying with {tech} today");
        prop_assert!(detect(&text, Vocabulary::Technologies).contains(tech));
    }

    #[test]
    fn fenced_block_count_is_half_the_fences(pairs in 0usize..5, extra in 0usize..2) {
        let mut text = String::new();
        for i in 0..pairs {
            text.push_str(&format!("step {i}\n```\ncode {i}\n```\n"));
        }
        for _ in 0..extra {
            text.push_str("```\n");
        }
        let stats = count_code_blocks(&text);
        prop_assert_eq!(stats.blocks as usize, (2 * pairs + extra) / 2);
        prop_assert_eq!(stats.has_code, stats.blocks > 0 || stats.inline > 0);
    }

    #[test]
    fn project_names_respect_the_cap(name in "[a-z][a-z0-9]{0,120}", cap in 1usize..60) {
        let text = format!("the project named {name}");
        let extracted = extract_project_name(&text, cap);
        prop_assert!(extracted.is_some());
        prop_assert!(extracted.unwrap_or_default().chars().count() <= cap);
    }

    #[test]
    fn tags_are_deterministic(text in ".{0,200}") {
        prop_assert_eq!(extract_tags(&text, ""), extract_tags(&text, ""));
    }
}
