//! Fenced and inline code counting.

use rapport_core::CodeBlockStats;

const FENCE: &str = "```";

/// Count fenced blocks (pairs of ```` ``` ````) and single-backtick inline spans.
///
/// Inline spans are only counted outside fences and never cross a line break.
pub fn count_code_blocks(text: &str) -> CodeBlockStats {
    let fences = text.matches(FENCE).count();
    let blocks = (fences / 2) as u32;

    let inline: u32 = text
        .split(FENCE)
        .step_by(2)
        .flat_map(str::lines)
        .map(inline_spans)
        .sum();

    CodeBlockStats {
        blocks,
        inline,
        has_code: blocks > 0 || inline > 0,
    }
}

fn inline_spans(line: &str) -> u32 {
    let mut count = 0;
    let mut rest = line;
    while let Some(open) = rest.find('`') {
        let after = &rest[open + 1..];
        match after.find('`') {
            // "``" is not a span; skip one backtick and keep scanning.
            Some(0) => rest = after,
            Some(close) => {
                count += 1;
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    count
}
