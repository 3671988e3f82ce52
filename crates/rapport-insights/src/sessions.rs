//! Session derivation: consecutive interactions separated by less than an idle gap.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use rapport_core::{InteractionRecord, QuestionType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub message_count: usize,
    pub channels: BTreeSet<String>,
    /// Languages, frameworks and technologies mentioned during the session.
    pub topics: BTreeSet<String>,
    pub dominant_question_type: QuestionType,
}

impl SessionSnapshot {
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }
}

/// Group interactions (any order) into sessions, oldest session first.
pub fn derive_sessions(interactions: &[InteractionRecord], gap: Duration) -> Vec<SessionSnapshot> {
    let mut ordered: Vec<&InteractionRecord> = interactions.iter().collect();
    ordered.sort_by_key(|r| r.timestamp);

    let mut sessions = Vec::new();
    let mut current: Vec<&InteractionRecord> = Vec::new();
    for record in ordered {
        if let Some(last) = current.last() {
            if record.timestamp - last.timestamp > gap {
                sessions.push(snapshot(&current));
                current.clear();
            }
        }
        current.push(record);
    }
    if !current.is_empty() {
        sessions.push(snapshot(&current));
    }
    sessions
}

fn snapshot(records: &[&InteractionRecord]) -> SessionSnapshot {
    let mut channels = BTreeSet::new();
    let mut topics = BTreeSet::new();
    let mut question_counts: BTreeMap<QuestionType, usize> = BTreeMap::new();

    for r in records {
        channels.insert(r.channel.clone());
        topics.extend(r.tags.languages.iter().cloned());
        topics.extend(r.tags.frameworks.iter().cloned());
        topics.extend(r.tags.technologies.iter().cloned());
        *question_counts.entry(r.tags.question_type).or_default() += 1;
    }

    // BTreeMap iterates in declaration order, so max_by_key keeps the last of equals;
    // reverse to let the earlier variant win ties.
    let dominant_question_type = question_counts
        .iter()
        .rev()
        .max_by_key(|(_, count)| **count)
        .map(|(qt, _)| *qt)
        .unwrap_or(QuestionType::General);

    SessionSnapshot {
        started_at: records.first().map(|r| r.timestamp).unwrap_or_default(),
        ended_at: records.last().map(|r| r.timestamp).unwrap_or_default(),
        message_count: records.len(),
        channels,
        topics,
        dominant_question_type,
    }
}
