//! Question type classification. First matching rule wins.

use rapport_core::QuestionType;

/// Rules in precedence order. `General` is the fallback and has no keywords.
const RULES: &[(QuestionType, &[&str])] = &[
    (QuestionType::HowTo, &["how to", "how do"]),
    (QuestionType::Debugging, &["debug", "error", "fix"]),
    (QuestionType::CodeReview, &["review", "feedback"]),
    (QuestionType::BestPractices, &["best practice", "recommend"]),
    (QuestionType::Explanation, &["explain", "what is"]),
    (
        QuestionType::Optimization,
        &["optimiz", "optimis", "performance"],
    ),
    (QuestionType::Architecture, &["design", "architecture"]),
];

pub fn classify_question_type(text: &str) -> QuestionType {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(qt, _)| *qt)
        .unwrap_or(QuestionType::General)
}
