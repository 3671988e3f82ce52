pub mod aggregation_config;
pub mod cache_config;
pub mod extraction_config;
pub mod observability_config;
pub mod storage_config;
pub mod summary_config;
pub mod trend_config;

use serde::{Deserialize, Serialize};

pub use aggregation_config::AggregationConfig;
pub use cache_config::CacheConfig;
pub use extraction_config::ExtractionConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;
pub use summary_config::SummaryConfig;
pub use trend_config::TrendConfig;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RapportConfig {
    pub storage: StorageConfig,
    pub extraction: ExtractionConfig,
    pub aggregation: AggregationConfig,
    pub trends: TrendConfig,
    pub summary: SummaryConfig,
    pub cache: CacheConfig,
    pub observability: ObservabilityConfig,
}

impl RapportConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
