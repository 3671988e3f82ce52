//! Trend analysis: working-hour rhythm, per-skill learning trajectory, planning
//! style and most active weekday.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use rapport_core::config::TrendConfig;
use rapport_core::{Complexity, InteractionRecord};

use crate::aggregation::AggregateResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkingHoursTrend {
    MorningPerson,
    AfternoonPerson,
    EveningPerson,
}

impl WorkingHoursTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MorningPerson => "morning-person",
            Self::AfternoonPerson => "afternoon-person",
            Self::EveningPerson => "evening-person",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursPattern {
    /// Up to three busiest local hours, busiest first.
    pub peak_hours: Vec<u32>,
    pub trend: WorkingHoursTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningTrend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTrend {
    pub skill: String,
    pub trend: LearningTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskBreakdownStyle {
    Detailed,
    HighLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendReport {
    pub working_hours: Option<WorkingHoursPattern>,
    /// Same order as the aggregate's skills.
    pub learning: Vec<SkillTrend>,
    pub task_breakdown: Option<TaskBreakdownStyle>,
    pub most_active_weekday: Option<Weekday>,
}

impl TrendReport {
    pub fn improving_skills(&self) -> impl Iterator<Item = &str> {
        self.learning
            .iter()
            .filter(|t| t.trend == LearningTrend::Improving)
            .map(|t| t.skill.as_str())
    }
}

const PEAK_HOURS: usize = 3;
const MIN_TREND_ENTRIES: usize = 3;
const RECENT_TREND_ENTRIES: usize = 5;
const PLANNING_KEYWORDS: &[&str] = &["task", "step", "plan"];

pub fn analyze(aggregates: &AggregateResult, config: &TrendConfig) -> TrendReport {
    let offset = local_offset(config.utc_offset_hours);

    TrendReport {
        working_hours: working_hours(aggregates.interactions.iter().map(|r| r.timestamp), offset),
        learning: aggregates
            .skills
            .iter()
            .map(|s| SkillTrend {
                skill: s.skill.clone(),
                trend: learning_trend(&s.difficulties()),
            })
            .collect(),
        task_breakdown: task_breakdown_style(
            &aggregates.interactions,
            &config.planning_channels,
            config.detailed_planning_ratio,
        ),
        most_active_weekday: most_active_weekday(
            aggregates.interactions.iter().map(|r| r.timestamp),
            offset,
        ),
    }
}

/// Out-of-range offsets fall back to UTC.
fn local_offset(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Peak local hours, one count per timestamp.
pub fn working_hours(
    timestamps: impl IntoIterator<Item = DateTime<Utc>>,
    offset: FixedOffset,
) -> Option<WorkingHoursPattern> {
    let mut buckets = [0u32; 24];
    for ts in timestamps {
        buckets[ts.with_timezone(&offset).hour() as usize] += 1;
    }

    let mut hours: Vec<u32> = (0..24).filter(|h| buckets[*h as usize] > 0).collect();
    if hours.is_empty() {
        return None;
    }
    hours.sort_by(|a, b| buckets[*b as usize].cmp(&buckets[*a as usize]).then(a.cmp(b)));
    hours.truncate(PEAK_HOURS);

    let trend = classify_peak_hours(&hours);
    Some(WorkingHoursPattern {
        peak_hours: hours,
        trend,
    })
}

/// Morning 6-11, afternoon 12-17, evening 18-23. Ties favor morning, then evening.
pub fn classify_peak_hours(peak_hours: &[u32]) -> WorkingHoursTrend {
    let count = |range: std::ops::RangeInclusive<u32>| {
        peak_hours.iter().filter(|h| range.contains(h)).count()
    };
    let morning = count(6..=11);
    let afternoon = count(12..=17);
    let evening = count(18..=23);

    if morning >= afternoon && morning >= evening {
        WorkingHoursTrend::MorningPerson
    } else if evening >= afternoon {
        WorkingHoursTrend::EveningPerson
    } else {
        WorkingHoursTrend::AfternoonPerson
    }
}

/// Compare the tier of the newest entries against the tier of the older ones.
/// `difficulties` is oldest first.
pub fn learning_trend(difficulties: &[Complexity]) -> LearningTrend {
    let n = difficulties.len();
    if n < MIN_TREND_ENTRIES {
        return LearningTrend::InsufficientData;
    }

    let split = n - RECENT_TREND_ENTRIES.min(n - 1);
    let (older, recent) = difficulties.split_at(split);
    let tier = |group: &[Complexity]| {
        let sum: u32 = group.iter().map(Complexity::score).sum();
        Complexity::from_average(f64::from(sum) / group.len() as f64).score()
    };

    match tier(recent).cmp(&tier(older)) {
        std::cmp::Ordering::Greater => LearningTrend::Improving,
        std::cmp::Ordering::Less => LearningTrend::Declining,
        std::cmp::Ordering::Equal => LearningTrend::Stable,
    }
}

pub fn task_breakdown_style(
    interactions: &[InteractionRecord],
    planning_channels: &[String],
    detailed_ratio: f64,
) -> Option<TaskBreakdownStyle> {
    let planning: Vec<String> = interactions
        .iter()
        .filter(|r| planning_channels.iter().any(|c| c.eq_ignore_ascii_case(&r.channel)))
        .map(|r| r.user_text.to_lowercase())
        .collect();
    if planning.is_empty() {
        return None;
    }

    let detailed = planning
        .iter()
        .filter(|text| PLANNING_KEYWORDS.iter().any(|k| text.contains(k)))
        .count();
    let ratio = detailed as f64 / planning.len() as f64;
    Some(if ratio > detailed_ratio {
        TaskBreakdownStyle::Detailed
    } else {
        TaskBreakdownStyle::HighLevel
    })
}

/// Weekday with the most interactions; ties go to the earlier day, Monday first.
pub fn most_active_weekday(
    timestamps: impl IntoIterator<Item = DateTime<Utc>>,
    offset: FixedOffset,
) -> Option<Weekday> {
    let mut counts = [0u32; 7];
    for ts in timestamps {
        counts[ts.with_timezone(&offset).weekday().num_days_from_monday() as usize] += 1;
    }
    WEEK.iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(day, _)| *day)
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
