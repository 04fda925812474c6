//! Tracing setup for the probe.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber, logging to stderr so stdout stays
/// machine-readable.
///
/// Filter precedence: `override_level`, then `RUST_LOG`, then the config.
///
/// # Errors
///
/// Fails on invalid filter directives or if a subscriber is already set.
pub fn init(cfg: &LoggingConfig, override_level: Option<&str>) -> anyhow::Result<()> {
    let filter = match override_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cfg.level))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if cfg.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
