//! Domain models for the access gate.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AccessGateError;

/// Locally cached admin profile.
///
/// The payload shape belongs to the backend; the gate stores and replaces it
/// as an opaque blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthRecord(Value);

impl AuthRecord {
    #[must_use]
    pub fn new(profile: Value) -> Self {
        Self(profile)
    }

    /// The opaque admin profile.
    #[must_use]
    pub fn profile(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_profile(self) -> Value {
        self.0
    }
}

impl From<Value> for AuthRecord {
    fn from(profile: Value) -> Self {
        Self(profile)
    }
}

/// Credential identifying the session to the backend.
///
/// Carries the value of the `Cookie` header the transport would otherwise
/// attach implicitly. `Debug` output redacts it.
#[derive(Debug, Clone, Default)]
pub struct SessionCredential {
    cookie: Option<SecretString>,
}

impl SessionCredential {
    /// A credential that sends no cookie.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A credential carrying a raw `Cookie` header value, e.g. `sid=abc`.
    ///
    /// An empty or blank value yields [`SessionCredential::none`].
    #[must_use]
    pub fn cookie(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            return Self::none();
        }
        Self {
            cookie: Some(SecretString::from(value)),
        }
    }

    /// The `Cookie` header value to send, if any.
    #[must_use]
    pub fn cookie_header(&self) -> Option<&str> {
        self.cookie.as_ref().map(ExposeSecret::expose_secret)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookie.is_none()
    }
}

/// Why a remote check could not reach a conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndeterminateReason {
    /// The verification endpoint does not exist or refused the connection.
    EndpointUnavailable,
    /// The backend host could not be reached at all.
    NetworkUnreachable,
    /// Timeouts, malformed replies, unexpected statuses.
    OtherError,
}

impl fmt::Display for IndeterminateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::EndpointUnavailable => "endpoint-unavailable",
            Self::NetworkUnreachable => "network-unreachable",
            Self::OtherError => "other-error",
        };
        f.write_str(tag)
    }
}

/// Classified result of one remote session check. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// The backend asserts the session is authenticated. Carries the fresh
    /// profile when the backend supplied one.
    Confirmed(Option<AuthRecord>),
    /// The backend asserts the session is not valid.
    Rejected,
    /// The check could not be completed.
    Indeterminate(IndeterminateReason),
}

/// Tri-state verdict for one navigation into a protected area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationVerdict {
    /// Verification in flight.
    Pending,
    Granted,
    Denied,
}

impl AuthorizationVerdict {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Terminal verdict together with the condition that produced it.
///
/// A fail-open grant carries the verification failure as its `cause`, so the
/// decision stays observable even though access was allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub verdict: AuthorizationVerdict,
    pub cause: Option<AccessGateError>,
}

impl GateOutcome {
    /// Access granted on a confirmed session or a public route.
    #[must_use]
    pub fn granted() -> Self {
        Self {
            verdict: AuthorizationVerdict::Granted,
            cause: None,
        }
    }

    /// Access granted even though `cause` prevented confirmation.
    #[must_use]
    pub fn granted_despite(cause: AccessGateError) -> Self {
        Self {
            verdict: AuthorizationVerdict::Granted,
            cause: Some(cause),
        }
    }

    #[must_use]
    pub fn denied(cause: AccessGateError) -> Self {
        Self {
            verdict: AuthorizationVerdict::Denied,
            cause: Some(cause),
        }
    }
}

/// What the routing collaborator should do for a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision<C> {
    /// Verification still in flight; show a loading placeholder.
    Loading,
    /// Render the protected content.
    Render(C),
    /// Go to the authentication entry point. `location` already carries
    /// `return_to` so the login page can send the user back.
    Redirect { location: String, return_to: String },
}

impl<C> GateDecision<C> {
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}
