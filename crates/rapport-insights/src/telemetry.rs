//! Global tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use rapport_core::config::ObservabilityConfig;

/// Install a stderr fmt subscriber. `RUST_LOG` wins over the configured level.
/// Subsequent calls are no-ops.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // try_init fails only when a global subscriber is already set.
    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = ObservabilityConfig::default();
        init_tracing(&config);
        init_tracing(&ObservabilityConfig {
            json: true,
            ..config
        });
        tracing::info!("tracing initialized twice");
    }
}
