//! Context cache: Moka TTL cache of computed aggregates + trends.
//! Keyed by (user, channel type, window). Writes for a user invalidate all of
//! that user's entries.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use rapport_core::config::CacheConfig;

use crate::aggregation::AggregateResult;
use crate::trends::TrendReport;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextKey {
    pub user_id: String,
    pub channel_type: String,
    pub window_days: u32,
}

impl ContextKey {
    pub fn new(user_id: &str, channel_type: &str, window_days: u32) -> Self {
        Self {
            user_id: user_id.to_string(),
            channel_type: channel_type.to_string(),
            window_days,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CachedContext {
    pub aggregates: AggregateResult,
    pub trends: TrendReport,
}

pub struct ContextCache {
    inner: Option<Cache<ContextKey, Arc<CachedContext>>>,
}

impl ContextCache {
    pub fn new(config: &CacheConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let inner = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .support_invalidation_closures()
            .build();
        Self { inner: Some(inner) }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get(&self, key: &ContextKey) -> Option<Arc<CachedContext>> {
        self.inner.as_ref()?.get(key)
    }

    pub fn insert(&self, key: ContextKey, value: CachedContext) -> Arc<CachedContext> {
        let value = Arc::new(value);
        if let Some(cache) = &self.inner {
            cache.insert(key, Arc::clone(&value));
        }
        value
    }

    /// Drop every entry for a user, across channel types and windows.
    pub fn invalidate_user(&self, user_id: &str) {
        let Some(cache) = &self.inner else {
            return;
        };
        let user_id = user_id.to_string();
        // Only fails when invalidation closures are unsupported, which `new` enables.
        if cache
            .invalidate_entries_if(move |key, _| key.user_id == user_id)
            .is_err()
        {
            cache.invalidate_all();
        }
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }

    /// Approximate; Moka applies pending maintenance lazily.
    pub fn entry_count(&self) -> u64 {
        self.inner.as_ref().map_or(0, |c| {
            c.run_pending_tasks();
            c.entry_count()
        })
    }
}

impl Default for ContextCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
