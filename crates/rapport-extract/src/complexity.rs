//! Keyword-priority complexity tiers.
//!
//! Keywords are stems so that inflections ("optimization", "building") match.

use rapport_core::Complexity;

const COMPLEX_STEMS: &[&str] = &[
    "architecture",
    "scalab",
    "optimiz",
    "optimis",
    "refactor",
    "complex",
    "advanced",
    "performance",
];

const MEDIUM_STEMS: &[&str] = &["implement", "creat", "build", "design", "integrat"];

pub fn assess_complexity(text: &str) -> Complexity {
    let lower = text.to_lowercase();
    let any = |stems: &[&str]| stems.iter().any(|s| lower.contains(s));
    if any(COMPLEX_STEMS) {
        Complexity::Complex
    } else if any(MEDIUM_STEMS) {
        Complexity::Medium
    } else {
        Complexity::Simple
    }
}
