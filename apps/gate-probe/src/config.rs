//! Probe configuration file.

use std::path::Path;

use access_gate::AccessGateConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level YAML document.
///
/// ```yaml
/// access_gate:
///   backend_url: "https://api.example.com"
///   verify_path: "/api/admin/verify"
///   failure_policy:
///     verification_fault: closed
/// logging:
///   level: "info,access_gate=debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub access_gate: AccessGateConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives. `RUST_LOG` wins when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl ProbeConfig {
    /// Load from `path`, or defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or unknown fields.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_saphyr::from_str(raw)?)
    }
}
