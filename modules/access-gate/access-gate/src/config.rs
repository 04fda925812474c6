//! Configuration for the access gate.

use std::path::PathBuf;
use std::time::Duration;

use access_gate_sdk::IndeterminateReason;
use serde::{Deserialize, Serialize};

/// Gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessGateConfig {
    /// Base URL of the authoritative backend, e.g. `https://api.example.com`.
    pub backend_url: String,

    /// Path of the session verification endpoint on the backend.
    pub verify_path: String,

    /// Upper bound for one verification round trip. Expiry counts as an
    /// `other-error` failure.
    pub verify_timeout_ms: u64,

    /// Authentication entry point used for redirects.
    pub login_path: String,

    /// Query parameter carrying the originally requested location.
    pub return_param: String,

    /// Route patterns (matchit syntax) that require a granted verdict.
    pub protected_routes: Vec<String>,

    /// Route patterns that stay reachable without a session. Takes
    /// precedence over `protected_routes`.
    pub public_routes: Vec<String>,

    pub storage: StorageConfig,

    pub failure_policy: FailurePolicy,
}

impl Default for AccessGateConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_owned(),
            verify_path: "/api/admin/verify".to_owned(),
            verify_timeout_ms: 10_000,
            login_path: "/admin/login".to_owned(),
            return_param: "redirect".to_owned(),
            protected_routes: vec!["/admin".to_owned(), "/admin/{*rest}".to_owned()],
            public_routes: vec!["/admin/login".to_owned()],
            storage: StorageConfig::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl AccessGateConfig {
    #[must_use]
    pub fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }

    /// Full URL of the verification endpoint.
    #[must_use]
    pub fn verify_url(&self) -> String {
        format!(
            "{}/{}",
            self.backend_url.trim_end_matches('/'),
            self.verify_path.trim_start_matches('/')
        )
    }
}

/// Where the session slot lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the slot file. Defaults to the platform data
    /// directory when unset.
    pub dir: Option<PathBuf>,

    /// Name of the slot.
    pub slot: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            slot: "adminUser".to_owned(),
        }
    }
}

impl StorageConfig {
    /// Resolve the slot directory, falling back to `<data_dir>/access-gate`.
    #[must_use]
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("access-gate")
        })
    }
}

/// What to do when verification cannot be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailMode {
    /// Trust the cached record and grant access.
    #[default]
    Open,
    /// Deny access. The cached record is kept.
    Closed,
}

/// Per-reason handling of inconclusive verifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FailurePolicy {
    pub endpoint_unavailable: FailMode,
    pub network_unreachable: FailMode,
    pub verification_fault: FailMode,
}

impl FailurePolicy {
    /// Deny on every inconclusive verification.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            endpoint_unavailable: FailMode::Closed,
            network_unreachable: FailMode::Closed,
            verification_fault: FailMode::Closed,
        }
    }

    #[must_use]
    pub fn mode_for(&self, reason: IndeterminateReason) -> FailMode {
        match reason {
            IndeterminateReason::EndpointUnavailable => self.endpoint_unavailable,
            IndeterminateReason::NetworkUnreachable => self.network_unreachable,
            IndeterminateReason::OtherError => self.verification_fault,
        }
    }

    /// True if any reason grants access on failure.
    #[must_use]
    pub fn fails_open(&self) -> bool {
        [
            self.endpoint_unavailable,
            self.network_unreachable,
            self.verification_fault,
        ]
        .contains(&FailMode::Open)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn verify_url_joins_without_double_slash() {
        let cfg = AccessGateConfig {
            backend_url: "https://api.example.com/".to_owned(),
            verify_path: "/api/admin/verify".to_owned(),
            ..AccessGateConfig::default()
        };
        assert_eq!(cfg.verify_url(), "https://api.example.com/api/admin/verify");
    }

    #[test]
    fn default_policy_fails_open_everywhere() {
        let policy = FailurePolicy::default();
        assert!(policy.fails_open());
        assert_eq!(
            policy.mode_for(IndeterminateReason::OtherError),
            FailMode::Open
        );
    }

    #[test]
    fn strict_policy_never_fails_open() {
        let policy = FailurePolicy::strict();
        assert!(!policy.fails_open());
        assert_eq!(
            policy.mode_for(IndeterminateReason::EndpointUnavailable),
            FailMode::Closed
        );
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: AccessGateConfig =
            serde_json::from_str(r#"{ "failure_policy": { "verification_fault": "closed" } }"#)
                .unwrap();
        assert_eq!(cfg.login_path, "/admin/login");
        assert_eq!(cfg.failure_policy.verification_fault, FailMode::Closed);
        assert_eq!(cfg.failure_policy.endpoint_unavailable, FailMode::Open);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<AccessGateConfig, _> =
            serde_json::from_str(r#"{ "verify_timeout": 5 }"#);
        assert!(result.is_err());
    }
}
