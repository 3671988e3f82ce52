//! SqlitePatternStorage against in-memory and file-backed databases.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use rapport_core::models::RECENT_SKILL_INTERACTIONS;
use rapport_core::{
    Complexity, IPatternStorage, InteractionRecord, InteractionTags, ProjectActivity,
    ProjectInteraction, ResetFilter, SkillActivity, SkillCategory, SkillInteraction, SkillMention,
};
use rapport_storage::migrations::LATEST_VERSION;
use rapport_storage::SqlitePatternStorage;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
}

fn record(id: &str, user: &str, channel: &str, ts: DateTime<Utc>) -> InteractionRecord {
    let mut tags = InteractionTags::default();
    tags.languages.insert("rust".to_string());
    InteractionRecord {
        id: id.to_string(),
        user_id: user.to_string(),
        channel: channel.to_string(),
        user_text: format!("message {id}"),
        response_text: "ok".to_string(),
        tags,
        timestamp: ts,
    }
}

fn project(user: &str, name: &str, channel: &str, ts: DateTime<Utc>, tech: &[&str]) -> ProjectActivity {
    ProjectActivity {
        user_id: user.to_string(),
        project_name: name.to_string(),
        technologies: tech.iter().map(|s| s.to_string()).collect(),
        languages: BTreeSet::from(["rust".to_string()]),
        entry: ProjectInteraction {
            timestamp: ts,
            message: "progress update".to_string(),
            response: "noted".to_string(),
            channel: channel.to_string(),
        },
    }
}

fn skill(user: &str, name: &str, channel: &str, ts: DateTime<Utc>, difficulty: Complexity) -> SkillActivity {
    SkillActivity {
        user_id: user.to_string(),
        mention: SkillMention {
            skill: name.to_string(),
            category: SkillCategory::Programming,
            progress_value: difficulty.score(),
        },
        entry: SkillInteraction {
            timestamp: ts,
            channel: channel.to_string(),
            context: "asked about traits".to_string(),
            difficulty,
        },
    }
}

#[test]
fn interactions_round_trip_newest_first_within_window() {
    let storage = SqlitePatternStorage::open_in_memory().unwrap();
    let t0 = base_time();
    for i in 0..5 {
        storage
            .insert_interaction(&record(&format!("i{i}"), "alice", "general", t0 + Duration::hours(i)))
            .unwrap();
    }
    storage
        .insert_interaction(&record("other", "bob", "general", t0))
        .unwrap();

    let since = t0 + Duration::hours(1);
    let found = storage.query_interactions("alice", since, 10).unwrap();
    let ids: Vec<_> = found.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["i4", "i3", "i2", "i1"]);
    assert!(found[0].tags.languages.contains("rust"));
    assert_eq!(found[0].timestamp, t0 + Duration::hours(4));

    let limited = storage.query_interactions("alice", t0, 2).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(storage.count_interactions("alice").unwrap(), 5);
    assert_eq!(storage.count_interactions("nobody").unwrap(), 0);
}

#[test]
fn project_upsert_merges_and_appends() {
    let storage = SqlitePatternStorage::open_in_memory().unwrap();
    let t0 = base_time();
    storage
        .upsert_project_context(&project("alice", "atlas", "general", t0, &["docker"]))
        .unwrap();
    storage
        .upsert_project_context(&project("alice", "atlas", "planning", t0 - Duration::hours(2), &["redis"]))
        .unwrap();

    let ctx = storage.get_project_context("alice", "atlas").unwrap().unwrap();
    assert_eq!(ctx.interaction_count(), 2);
    assert_eq!(
        ctx.technologies.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["docker", "redis"]
    );
    // An older entry never moves last_activity backwards.
    assert_eq!(ctx.last_activity, t0);
    assert_eq!(ctx.interactions[1].channel, "planning");
}

#[test]
fn projects_and_skills_come_back_in_recency_order() {
    let storage = SqlitePatternStorage::open_in_memory().unwrap();
    let t0 = base_time();
    storage.upsert_project_context(&project("alice", "old", "general", t0 - Duration::days(30), &[])).unwrap();
    storage.upsert_project_context(&project("alice", "mid", "general", t0 - Duration::days(1), &[])).unwrap();
    storage.upsert_project_context(&project("alice", "new", "general", t0, &[])).unwrap();

    let since = t0 - Duration::days(14);
    let names: Vec<_> = storage
        .query_project_contexts("alice", since, 5)
        .unwrap()
        .into_iter()
        .map(|p| p.project_name)
        .collect();
    assert_eq!(names, vec!["new", "mid"]);

    storage.upsert_skill_progression(&skill("alice", "rust", "general", t0 - Duration::days(2), Complexity::Simple)).unwrap();
    storage.upsert_skill_progression(&skill("alice", "python", "general", t0, Complexity::Medium)).unwrap();
    let skills: Vec<_> = storage
        .query_skill_progressions("alice", since, 10)
        .unwrap()
        .into_iter()
        .map(|s| s.skill)
        .collect();
    assert_eq!(skills, vec!["python", "rust"]);
}

#[test]
fn skill_ring_stays_bounded_across_upserts() {
    let storage = SqlitePatternStorage::open_in_memory().unwrap();
    let t0 = base_time();
    for i in 0..15 {
        let difficulty = if i < 5 { Complexity::Simple } else { Complexity::Complex };
        storage
            .upsert_skill_progression(&skill("alice", "rust", "general", t0 + Duration::minutes(i), difficulty))
            .unwrap();
    }

    let p = storage.get_skill_progression("alice", "rust").unwrap().unwrap();
    assert_eq!(p.interaction_count, 15);
    assert_eq!(p.recent_interactions.len(), RECENT_SKILL_INTERACTIONS);
    assert_eq!(p.level_progress["programming"], 5 + 10 * 3);
    assert_eq!(p.last_updated, t0 + Duration::minutes(14));
    assert!(p.difficulties().iter().all(|d| *d == Complexity::Complex));
}

#[test]
fn user_reset_removes_everything_for_that_user_only() {
    let storage = SqlitePatternStorage::open_in_memory().unwrap();
    let t0 = base_time();
    for user in ["alice", "bob"] {
        storage.insert_interaction(&record(&format!("{user}-1"), user, "general", t0)).unwrap();
        storage.upsert_project_context(&project(user, "atlas", "general", t0, &[])).unwrap();
        storage.upsert_skill_progression(&skill(user, "rust", "general", t0, Complexity::Simple)).unwrap();
    }

    let counts = storage.delete_memory(&ResetFilter::user("alice")).unwrap();
    assert_eq!(counts.interactions, 1);
    assert_eq!(counts.project_interactions, 1);
    assert_eq!(counts.projects, 1);
    assert_eq!(counts.skills, 1);

    assert_eq!(storage.count_interactions("alice").unwrap(), 0);
    assert_eq!(storage.count_interactions("bob").unwrap(), 1);
    assert!(storage.get_project_context("bob", "atlas").unwrap().is_some());
    assert!(storage.get_skill_progression("bob", "rust").unwrap().is_some());
}

#[test]
fn channel_reset_backs_channel_entries_out_of_skills() {
    let storage = SqlitePatternStorage::open_in_memory().unwrap();
    let t0 = base_time();
    storage.insert_interaction(&record("a", "alice", "planning", t0)).unwrap();
    storage.insert_interaction(&record("b", "alice", "general", t0 + Duration::minutes(1))).unwrap();
    storage.upsert_project_context(&project("alice", "atlas", "planning", t0, &[])).unwrap();
    storage.upsert_project_context(&project("alice", "atlas", "general", t0 + Duration::hours(1), &[])).unwrap();
    storage.upsert_project_context(&project("alice", "scratch", "planning", t0, &[])).unwrap();
    storage.upsert_skill_progression(&skill("alice", "rust", "general", t0, Complexity::Simple)).unwrap();
    storage
        .upsert_skill_progression(&skill("alice", "rust", "planning", t0 + Duration::hours(2), Complexity::Complex))
        .unwrap();
    storage
        .upsert_skill_progression(&skill("alice", "python", "planning", t0 + Duration::hours(2), Complexity::Medium))
        .unwrap();

    let counts = storage
        .delete_memory(&ResetFilter::user("alice").with_channel("planning"))
        .unwrap();
    assert_eq!(counts.interactions, 1);
    assert_eq!(counts.project_interactions, 2);
    assert_eq!(counts.projects, 1);
    assert_eq!(counts.skills, 1);

    let atlas = storage.get_project_context("alice", "atlas").unwrap().unwrap();
    assert_eq!(atlas.interaction_count(), 1);
    assert!(storage.get_project_context("alice", "scratch").unwrap().is_none());

    // Built only from planning entries.
    assert!(storage.get_skill_progression("alice", "python").unwrap().is_none());

    let rust = storage.get_skill_progression("alice", "rust").unwrap().unwrap();
    assert_eq!(rust.interaction_count, 1);
    assert_eq!(rust.level_progress["programming"], 1);
    assert_eq!(rust.last_updated, t0);
    assert_eq!(rust.recent_interactions.len(), 1);
    assert!(rust.recent_interactions.iter().all(|e| e.channel == "general"));

    let recent = storage
        .query_skill_progressions("alice", t0 + Duration::hours(1), 10)
        .unwrap();
    assert!(recent.is_empty());
}

#[test]
fn empty_reset_filter_is_rejected() {
    let storage = SqlitePatternStorage::open_in_memory().unwrap();
    assert!(storage.delete_memory(&ResetFilter::default()).is_err());
}

#[test]
fn file_backed_store_is_shared_through_arc() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rapport.db");
    let storage: Arc<dyn IPatternStorage> =
        Arc::new(SqlitePatternStorage::open(&path, 2).unwrap());

    storage.insert_interaction(&record("x", "alice", "general", base_time())).unwrap();
    let health = storage.health_check().unwrap();
    assert!(health.connected);
    assert!(health.wal_mode);
    assert_eq!(health.schema_version, LATEST_VERSION);
    assert_eq!(storage.count_interactions("alice").unwrap(), 1);

    drop(storage);
    let reopened = SqlitePatternStorage::open(&path, 1).unwrap();
    assert_eq!(reopened.count_interactions("alice").unwrap(), 1);
}
