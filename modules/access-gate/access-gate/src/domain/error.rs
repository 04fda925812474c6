//! Domain errors for the access gate.

/// Invalid gate configuration, detected when the gate is built.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidRoute { pattern: String, reason: String },

    #[error("invalid backend url '{url}': {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("tls setup failed: {0}")]
    Tls(String),
}

impl ConfigError {
    #[must_use]
    pub fn invalid_route(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidRoute {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }
}
