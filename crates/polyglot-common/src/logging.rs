//! Structured logging infrastructure for Polyglot

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "polyglot_core=trace")
    pub level: String,
    /// Whether to use the compact single-line format
    pub compact: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            compact: true,
            include_targets: true,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// The engine itself only emits through the `tracing` facade; embedders that
/// never call this (or install their own subscriber) simply get no output.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.compact {
        let layer = fmt::layer()
            .with_target(config.include_targets)
            .compact();
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .pretty()
            .with_target(config.include_targets);
        registry.with(layer).try_init()?;
    }

    Ok(())
}
