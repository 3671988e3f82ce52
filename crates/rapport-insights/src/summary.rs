//! Summary compiler: renders aggregates and trends into a bounded digest.
//!
//! Each section is one `- ` line and is emitted only when its data is present.
//! Lines are appended whole while they fit in `max_chars`; a line that would
//! overflow is dropped, never cut.

use chrono::Weekday;

use rapport_core::config::SummaryConfig;
use rapport_core::DEFAULT_CHANNEL;

use crate::aggregation::AggregateResult;
use crate::sessions::SessionSnapshot;
use crate::trends::{TaskBreakdownStyle, TrendReport};

const TOP_PROJECTS: usize = 3;
const TOP_SKILLS: usize = 3;
const SESSION_TOPICS: usize = 5;

pub fn compile(aggregates: &AggregateResult, trends: &TrendReport, config: &SummaryConfig) -> String {
    let sections = [
        aggregates.latest_session().map(session_line),
        list_line("Preferred languages", &aggregates.preferred_languages),
        list_line("Preferred frameworks", &aggregates.preferred_frameworks),
        projects_line(aggregates),
        skills_line(aggregates, trends),
        complexity_line(aggregates, config.complex_share_threshold),
        question_types_line(aggregates),
        channel_line(aggregates),
        working_pattern_line(trends),
    ];

    let mut out = String::new();
    for line in sections.into_iter().flatten() {
        let bullet = format!("- {line}");
        let needed = if out.is_empty() { 0 } else { 1 } + bullet.chars().count();
        if out.chars().count() + needed > config.max_chars {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&bullet);
    }

    if out.is_empty() {
        config.fallback_text.clone()
    } else {
        out
    }
}

fn session_line(session: &SessionSnapshot) -> String {
    let channels: Vec<String> = session.channels.iter().map(|c| format!("#{c}")).collect();
    let mut line = if session.message_count == 1 {
        format!("Latest session: 1 message in {}", channels.join(", "))
    } else {
        format!(
            "Latest session: {} messages in {} over {} min",
            session.message_count,
            channels.join(", "),
            session.duration().num_minutes(),
        )
    };
    if !session.topics.is_empty() {
        let topics: Vec<&str> = session
            .topics
            .iter()
            .take(SESSION_TOPICS)
            .map(String::as_str)
            .collect();
        line.push_str(&format!(", topics: {}", topics.join(", ")));
    }
    line
}

fn list_line(label: &str, items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(format!("{label}: {}", items.join(", ")))
}

fn projects_line(aggregates: &AggregateResult) -> Option<String> {
    if aggregates.projects.is_empty() {
        return None;
    }
    let projects: Vec<String> = aggregates
        .projects
        .iter()
        .take(TOP_PROJECTS)
        .map(|p| {
            let count = p.interaction_count();
            let plural = if count == 1 { "" } else { "s" };
            let stack = p.tech_stack();
            if stack.is_empty() {
                format!("{} ({count} interaction{plural})", p.project_name)
            } else {
                format!(
                    "{} ({}; {count} interaction{plural})",
                    p.project_name,
                    stack.join(", ")
                )
            }
        })
        .collect();
    Some(format!("Active projects: {}", projects.join("; ")))
}

fn skills_line(aggregates: &AggregateResult, trends: &TrendReport) -> Option<String> {
    if aggregates.skills.is_empty() {
        return None;
    }
    // Stable sort keeps recency order among equal counts.
    let mut skills: Vec<_> = aggregates.skills.iter().collect();
    skills.sort_by(|a, b| b.interaction_count.cmp(&a.interaction_count));
    let top: Vec<&str> = skills
        .iter()
        .take(TOP_SKILLS)
        .map(|s| s.skill.as_str())
        .collect();

    let mut line = format!("Skill focus: {}", top.join(", "));
    let improving: Vec<&str> = trends
        .improving_skills()
        .filter(|s| top.contains(s))
        .collect();
    if !improving.is_empty() {
        line.push_str(&format!(" (currently improving: {})", improving.join(", ")));
    }
    Some(line)
}

fn complexity_line(aggregates: &AggregateResult, threshold: f64) -> Option<String> {
    let share = aggregates.complexity.complex_share();
    if aggregates.complexity.total() == 0 || share <= threshold {
        return None;
    }
    Some(format!(
        "Prefers complex tasks ({}% of recent requests)",
        (share * 100.0).round() as u32
    ))
}

fn question_types_line(aggregates: &AggregateResult) -> Option<String> {
    if aggregates.dominant_question_types.is_empty() {
        return None;
    }
    let names: Vec<String> = aggregates
        .dominant_question_types
        .iter()
        .map(|q| q.as_str().replace('-', " "))
        .collect();
    Some(format!("Common question types: {}", names.join(", ")))
}

fn channel_line(aggregates: &AggregateResult) -> Option<String> {
    if aggregates.interactions.is_empty() || aggregates.most_active_channel == DEFAULT_CHANNEL {
        return None;
    }
    Some(format!(
        "Most active in the #{} workflow",
        aggregates.most_active_channel
    ))
}

fn working_pattern_line(trends: &TrendReport) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(hours) = &trends.working_hours {
        parts.push(hours.trend.as_str().replace('-', " "));
    }
    if let Some(style) = trends.task_breakdown {
        parts.push(
            match style {
                TaskBreakdownStyle::Detailed => "plans in detailed steps",
                TaskBreakdownStyle::HighLevel => "plans at a high level",
            }
            .to_string(),
        );
    }
    if let Some(day) = trends.most_active_weekday {
        parts.push(format!("most active on {}", weekday_name(day)));
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!("Working pattern: {}", parts.join(", ")))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rapport_core::QuestionType;

    use crate::trends::{LearningTrend, SkillTrend, WorkingHoursPattern, WorkingHoursTrend};

    fn empty_aggregate() -> AggregateResult {
        AggregateResult::empty("u1", "general", 14, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
    }

    fn empty_trends() -> TrendReport {
        TrendReport {
            working_hours: None,
            learning: Vec::new(),
            task_breakdown: None,
            most_active_weekday: None,
        }
    }

    #[test]
    fn nothing_to_say_yields_fallback() {
        let config = SummaryConfig::default();
        assert_eq!(
            compile(&empty_aggregate(), &empty_trends(), &config),
            "No significant user patterns detected yet."
        );
    }

    #[test]
    fn sections_render_in_order_without_empty_bullets() {
        let mut agg = empty_aggregate();
        agg.preferred_languages = vec!["rust".into(), "python".into()];
        agg.dominant_question_types = vec![QuestionType::HowTo, QuestionType::CodeReview];
        let trends = TrendReport {
            working_hours: Some(WorkingHoursPattern {
                peak_hours: vec![9],
                trend: WorkingHoursTrend::MorningPerson,
            }),
            learning: vec![SkillTrend {
                skill: "rust".into(),
                trend: LearningTrend::Improving,
            }],
            task_breakdown: Some(TaskBreakdownStyle::Detailed),
            most_active_weekday: Some(Weekday::Tue),
        };

        let text = compile(&agg, &trends, &SummaryConfig::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "- Preferred languages: rust, python",
                "- Common question types: how to, code review",
                "- Working pattern: morning person, plans in detailed steps, most active on Tuesday",
            ]
        );
        assert!(!text.contains("Active projects"));
        assert!(lines.iter().all(|l| l.len() > 2));
    }

    fn session(minutes: i64, message_count: usize) -> SessionSnapshot {
        let started_at = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        SessionSnapshot {
            started_at,
            ended_at: started_at + chrono::Duration::minutes(minutes),
            message_count,
            channels: ["coding".to_string()].into_iter().collect(),
            topics: ["rust".to_string()].into_iter().collect(),
            dominant_question_type: QuestionType::HowTo,
        }
    }

    #[test]
    fn session_line_mentions_duration_only_for_multi_message_sessions() {
        assert_eq!(
            session_line(&session(0, 1)),
            "Latest session: 1 message in #coding, topics: rust"
        );
        assert_eq!(
            session_line(&session(25, 4)),
            "Latest session: 4 messages in #coding over 25 min, topics: rust"
        );
    }

    #[test]
    fn output_never_exceeds_limit_and_lines_stay_whole() {
        let mut agg = empty_aggregate();
        agg.preferred_languages = vec!["javascript".into(), "typescript".into()];
        agg.preferred_frameworks = vec!["react".into()];
        let config = SummaryConfig {
            max_chars: 40,
            ..SummaryConfig::default()
        };
        let text = compile(&agg, &empty_trends(), &config);
        assert!(text.chars().count() <= 40);
        assert_eq!(text, "- Preferred frameworks: react");
    }
}
