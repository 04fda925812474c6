//! Which navigation targets are protected areas.

use crate::config::AccessGateConfig;

use super::error::ConfigError;

/// Whether a navigation target needs a granted verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement {
    /// Renders without consulting the session.
    Public,
    /// Requires a granted verdict.
    Protected,
}

/// Route matcher over a set of patterns.
#[derive(Clone, Default)]
struct RouteMatcher {
    matcher: matchit::Router<()>,
}

impl RouteMatcher {
    fn from_patterns(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut matcher = matchit::Router::new();
        for pattern in patterns {
            matcher
                .insert(pattern.to_lowercase(), ())
                .map_err(|e| ConfigError::invalid_route(pattern.as_str(), e))?;
        }
        Ok(Self { matcher })
    }

    fn find(&self, path: &str) -> bool {
        self.matcher.at(path).is_ok()
    }
}

/// Route policy built from the protected and public patterns.
///
/// Public patterns win over protected ones so the login page stays
/// reachable under a protected prefix.
#[derive(Clone)]
pub struct RoutePolicy {
    protected: RouteMatcher,
    public: RouteMatcher,
}

impl RoutePolicy {
    /// Build the policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRoute`] if a pattern is malformed or
    /// conflicts with another pattern in the same set.
    pub fn new(protected: &[String], public: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            protected: RouteMatcher::from_patterns(protected)?,
            public: RouteMatcher::from_patterns(public)?,
        })
    }

    /// Build the policy from gate configuration.
    ///
    /// # Errors
    ///
    /// See [`RoutePolicy::new`].
    pub fn from_config(cfg: &AccessGateConfig) -> Result<Self, ConfigError> {
        Self::new(&cfg.protected_routes, &cfg.public_routes)
    }

    /// Resolve the requirement for a navigation target.
    ///
    /// Matching is case-insensitive. Query string, fragment, repeated
    /// slashes and a trailing slash are ignored.
    #[must_use]
    pub fn resolve(&self, target: &str) -> AccessRequirement {
        let path = normalize(target);
        if self.protected.find(&path) && !self.public.find(&path) {
            AccessRequirement::Protected
        } else {
            AccessRequirement::Public
        }
    }
}

/// Path component of `target` in canonical form: `/admin/`, `//admin` and
/// `/ADMIN` all become `/admin`.
fn normalize(target: &str) -> String {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let segments: Vec<&str> = target[..end].split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/")).to_lowercase()
}
