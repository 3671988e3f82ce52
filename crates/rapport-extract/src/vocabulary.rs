//! Curated vocabularies and case-insensitive substring detection.
//!
//! Declaration order matters: it is the tie-break order when preferences are ranked.
//! An occurrence of a term that sits entirely inside an occurrence of a longer
//! vocabulary term (`java` in `javascript`, `sql` in `mysql`) does not count.

use std::collections::BTreeSet;

use rapport_core::SkillCategory;

pub const LANGUAGES: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "rust",
    "golang",
    "c++",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "scala",
    "sql",
    "bash",
    "haskell",
    "elixir",
    "html",
    "css",
];

pub const FRAMEWORKS: &[&str] = &[
    "react",
    "vue",
    "angular",
    "svelte",
    "next.js",
    "express",
    "django",
    "flask",
    "fastapi",
    "spring",
    "rails",
    "laravel",
    "tokio",
    "actix",
    "axum",
    "tailwind",
];

pub const TECHNOLOGIES: &[&str] = &[
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "postgresql",
    "mysql",
    "sqlite",
    "mongodb",
    "redis",
    "graphql",
    "kafka",
    "terraform",
    "node.js",
    "nginx",
    "linux",
    "git",
    "webpack",
];

/// One of the three curated term lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    Languages,
    Frameworks,
    Technologies,
}

impl Vocabulary {
    pub const ALL: [Vocabulary; 3] = [Self::Languages, Self::Frameworks, Self::Technologies];

    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            Self::Languages => LANGUAGES,
            Self::Frameworks => FRAMEWORKS,
            Self::Technologies => TECHNOLOGIES,
        }
    }

    pub fn category(&self) -> SkillCategory {
        match self {
            Self::Languages => SkillCategory::Programming,
            Self::Frameworks => SkillCategory::Framework,
            Self::Technologies => SkillCategory::Technology,
        }
    }

    /// Declaration index of a term, used for deterministic tie-breaks.
    pub fn rank(&self, term: &str) -> Option<usize> {
        self.terms().iter().position(|t| *t == term)
    }
}

/// Terms from this vocabulary that appear in `text`, case-insensitively.
pub fn detect(text: &str, vocabulary: Vocabulary) -> BTreeSet<String> {
    let haystack = text.to_lowercase();
    vocabulary
        .terms()
        .iter()
        .filter(|term| contains_unshadowed(&haystack, term))
        .map(|term| term.to_string())
        .collect()
}

pub fn detect_languages(text: &str) -> BTreeSet<String> {
    detect(text, Vocabulary::Languages)
}

pub fn detect_frameworks(text: &str) -> BTreeSet<String> {
    detect(text, Vocabulary::Frameworks)
}

pub fn detect_technologies(text: &str) -> BTreeSet<String> {
    detect(text, Vocabulary::Technologies)
}

fn all_terms() -> impl Iterator<Item = &'static str> {
    LANGUAGES
        .iter()
        .chain(FRAMEWORKS)
        .chain(TECHNOLOGIES)
        .copied()
}

/// True if `term` occurs at least once outside every longer term that contains it.
fn contains_unshadowed(haystack: &str, term: &str) -> bool {
    if !haystack.contains(term) {
        return false;
    }

    let covering: Vec<(usize, usize)> = all_terms()
        .filter(|longer| longer.len() > term.len() && longer.contains(term))
        .flat_map(|longer| {
            haystack
                .match_indices(longer)
                .map(|(start, m)| (start, start + m.len()))
        })
        .collect();

    haystack.match_indices(term).any(|(start, m)| {
        let end = start + m.len();
        !covering.iter().any(|&(s, e)| s <= start && end <= e)
    })
}
