//! Error types for the access gate.

use thiserror::Error;

use crate::models::IndeterminateReason;

/// Failures of a [`SessionStore`](crate::SessionStore) backend.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// The backing storage could not be accessed.
    #[error("session slot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The slot holds bytes that do not decode to a record.
    #[error("session slot '{slot}' is corrupt: {reason}")]
    Corrupt { slot: String, reason: String },

    /// The record could not be encoded.
    #[error("session record serialization failed: {0}")]
    Serialization(String),
}

/// Why the gate did not simply confirm a session.
///
/// None of these escape the gate as faults: each one resolves to a terminal
/// verdict and is attached to the [`GateOutcome`](crate::GateOutcome) as its cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessGateError {
    /// No local record. A valid state, not a failure.
    #[error("no cached session record")]
    CacheMiss,

    /// The backend authoritatively refused the session.
    #[error("session rejected by backend")]
    SessionRejected,

    /// The verification endpoint is missing or the network is unreachable.
    #[error("session verification unavailable: {0}")]
    VerificationUnavailable(IndeterminateReason),

    /// Any other backend or transport fault (timeouts, malformed replies).
    #[error("session verification fault")]
    VerificationFault,

    /// The session store failed while the gate was using it.
    #[error("session store fault: {0}")]
    StoreFault(String),
}

impl AccessGateError {
    /// Map an inconclusive verification to its error category.
    #[must_use]
    pub fn from_indeterminate(reason: IndeterminateReason) -> Self {
        match reason {
            IndeterminateReason::EndpointUnavailable | IndeterminateReason::NetworkUnreachable => {
                Self::VerificationUnavailable(reason)
            }
            IndeterminateReason::OtherError => Self::VerificationFault,
        }
    }
}

impl From<SessionStoreError> for AccessGateError {
    fn from(e: SessionStoreError) -> Self {
        Self::StoreFault(e.to_string())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn indeterminate_reasons_map_to_categories() {
        assert_eq!(
            AccessGateError::from_indeterminate(IndeterminateReason::EndpointUnavailable),
            AccessGateError::VerificationUnavailable(IndeterminateReason::EndpointUnavailable)
        );
        assert_eq!(
            AccessGateError::from_indeterminate(IndeterminateReason::NetworkUnreachable),
            AccessGateError::VerificationUnavailable(IndeterminateReason::NetworkUnreachable)
        );
        assert_eq!(
            AccessGateError::from_indeterminate(IndeterminateReason::OtherError),
            AccessGateError::VerificationFault
        );
    }

    #[test]
    fn store_errors_become_store_faults() {
        let err = SessionStoreError::Corrupt {
            slot: "adminUser".to_owned(),
            reason: "expected value".to_owned(),
        };
        match AccessGateError::from(err) {
            AccessGateError::StoreFault(msg) => assert!(msg.contains("adminUser")),
            other => panic!("Expected StoreFault, got: {other:?}"),
        }
    }
}
