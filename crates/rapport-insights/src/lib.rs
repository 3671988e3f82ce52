//! # rapport-insights
//!
//! The behavioral side of rapport: the write path that tags and stores
//! interactions, the context aggregators, the trend analyzer and the summary
//! compiler, tied together by [`PatternMemory`].

pub mod aggregation;
pub mod cache;
pub mod memory;
pub mod sessions;
pub mod summary;
pub mod telemetry;
pub mod trends;

pub use aggregation::{AggregateResult, ComplexityDistribution};
pub use cache::{ContextCache, ContextKey};
pub use memory::{ContextBundle, ContextRequest, PatternMemory, StoreOutcome};
pub use sessions::SessionSnapshot;
pub use telemetry::init_tracing;
pub use trends::{LearningTrend, TaskBreakdownStyle, TrendReport, WorkingHoursTrend};
