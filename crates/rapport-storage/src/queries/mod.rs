//! Query modules, one per store. Each takes a borrowed `Connection` so the engine
//! decides whether it runs on the writer or a reader.

pub mod interaction_ops;
pub mod maintenance_ops;
pub mod project_ops;
pub mod skill_ops;

use chrono::{DateTime, Utc};

use rapport_core::RapportResult;

use crate::corrupt_row;

pub(crate) fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(table: &'static str, ms: i64) -> RapportResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| corrupt_row(table, format!("timestamp out of range: {ms}")))
}

/// SQLite integers are signed; clamp query limits into range.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
