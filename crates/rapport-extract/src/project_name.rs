//! Project-name extraction from free text.
//!
//! Patterns are tried in order and the first capture wins.

use std::sync::LazyLock;

use regex::Regex;

/// Default cap on an extracted name, in characters.
pub const DEFAULT_MAX_CHARS: usize = 50;

/// Words that end a "working on X" / "building X" name.
const NAME_TAIL: &str = r"(?:\s+(?:project|app|application|service|using|with|in|for|that|which|and|to|today|now)\b|[.,!?;:()]|$)";

static PROJECT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let patterns = [
        r#"(?im)\bproject\s+(?:named|called)\s+(?:"([^"]+)"|'([^']+)'|([a-z0-9][\w\-]*))"#.to_string(),
        format!(
            r"(?im)\bworking\s+on\s+(?:(?:a|an|the|my|our)\s+)?([a-z0-9][a-z0-9_\- ]*?){NAME_TAIL}"
        ),
        format!(
            r"(?im)\bbuilding\s+(?:(?:a|an|the|my|our)\s+)?([a-z0-9][a-z0-9_\- ]*?){NAME_TAIL}"
        ),
        r"(?im)\bmy\s+([a-z0-9][a-z0-9_\-]*(?:\s+[a-z0-9][a-z0-9_\-]*){0,2}?)\s+project\b"
            .to_string(),
    ];
    patterns
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

const ARTICLES: &[&str] = &["a ", "an ", "the "];

/// Extract a project name, truncated to `max_chars` characters.
pub fn extract_project_name(text: &str, max_chars: usize) -> Option<String> {
    PROJECT_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(text)?;
        let raw = caps.iter().skip(1).flatten().next()?.as_str();
        normalize(raw, max_chars)
    })
}

fn normalize(raw: &str, max_chars: usize) -> Option<String> {
    let mut name = raw.trim();
    for article in ARTICLES {
        let prefix = name.get(..article.len());
        if name.len() > article.len() && prefix.is_some_and(|p| p.eq_ignore_ascii_case(article)) {
            name = name[article.len()..].trim_start();
            break;
        }
    }
    let truncated: String = name.chars().take(max_chars).collect();
    let truncated = truncated.trim_end();
    if truncated.is_empty() {
        None
    } else {
        Some(truncated.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        extract_project_name(text, DEFAULT_MAX_CHARS)
    }

    #[test]
    fn all_patterns_compile() {
        assert_eq!(PROJECT_PATTERNS.len(), 4);
    }

    #[test]
    fn named_and_called() {
        assert_eq!(extract("a project named Atlas").as_deref(), Some("Atlas"));
        assert_eq!(
            extract(r#"the project called "Order Service" is slow"#).as_deref(),
            Some("Order Service")
        );
    }

    #[test]
    fn working_on_stops_at_tail_words() {
        assert_eq!(
            extract("I'm working on the billing service today").as_deref(),
            Some("billing")
        );
        assert_eq!(
            extract("Working on rapport-bot using rust").as_deref(),
            Some("rapport-bot")
        );
        assert_eq!(extract("working on inventory.").as_deref(), Some("inventory"));
    }

    #[test]
    fn building_and_my_project() {
        assert_eq!(
            extract("I'm building a weather dashboard with react").as_deref(),
            Some("weather dashboard")
        );
        assert_eq!(
            extract("Need help with my chess engine project").as_deref(),
            Some("chess engine")
        );
    }

    #[test]
    fn earlier_pattern_wins() {
        assert_eq!(
            extract("working on my site project named Zephyr").as_deref(),
            Some("Zephyr")
        );
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = format!("project named {}", "é".repeat(80));
        // "é" is not in the unquoted name class, so quote it.
        let quoted = format!("project named \"{}\"", "é".repeat(80));
        assert_eq!(extract(&long), None);
        let name = extract(&quoted).unwrap();
        assert_eq!(name.chars().count(), DEFAULT_MAX_CHARS);
    }

    #[test]
    fn no_project_mentioned() {
        assert_eq!(extract("how do I reverse a list?"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("project named \"   \""), None);
    }
}
