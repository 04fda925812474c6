//! Classification of a raw verification round trip.
//!
//! Pure function from "what the transport observed" to
//! [`VerificationOutcome`], so the branching can be tested without a server.

use access_gate_sdk::{AuthRecord, IndeterminateReason, VerificationOutcome};
use serde::Deserialize;
use serde_json::Value;

/// Body of a successful (2xx) verification response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub admin: Option<Value>,
}

/// Why the request did not produce a usable 2xx body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The server answered with a non-success status.
    Status(u16),
    /// The connection was actively refused.
    ConnectionRefused,
    /// The host could not be resolved or reached.
    Unreachable,
    /// No answer within the configured bound.
    Timeout,
    /// The body was not a verification response.
    Malformed(String),
    Other(String),
}

/// Classify one verification attempt.
#[must_use]
pub fn classify(result: Result<VerifyResponse, TransportFailure>) -> VerificationOutcome {
    match result {
        Ok(VerifyResponse {
            success: true,
            is_authenticated: true,
            admin,
        }) => VerificationOutcome::Confirmed(admin.filter(|v| !v.is_null()).map(AuthRecord::new)),
        // Any other 2xx answer is the backend saying no.
        Ok(_) | Err(TransportFailure::Status(401 | 403)) => VerificationOutcome::Rejected,
        Err(TransportFailure::Status(404) | TransportFailure::ConnectionRefused) => {
            VerificationOutcome::Indeterminate(IndeterminateReason::EndpointUnavailable)
        }
        Err(TransportFailure::Unreachable) => {
            VerificationOutcome::Indeterminate(IndeterminateReason::NetworkUnreachable)
        }
        Err(
            TransportFailure::Status(_)
            | TransportFailure::Timeout
            | TransportFailure::Malformed(_)
            | TransportFailure::Other(_),
        ) => VerificationOutcome::Indeterminate(IndeterminateReason::OtherError),
    }
}
