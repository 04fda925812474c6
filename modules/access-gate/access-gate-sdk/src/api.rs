//! Session verifier trait.
//!
//! Implementations ask the authoritative backend whether the session carried
//! by a credential is still valid and classify the answer.

use async_trait::async_trait;

use crate::models::{SessionCredential, VerificationOutcome};

/// Remote session verification.
///
/// The verifier never touches the session cache. It reports a classification
/// and the caller decides how the cache changes.
///
/// ```ignore
/// match verifier.verify(&credential).await {
///     VerificationOutcome::Confirmed(profile) => { /* refresh cache */ }
///     VerificationOutcome::Rejected => { /* clear cache */ }
///     VerificationOutcome::Indeterminate(reason) => { /* apply failure policy */ }
/// }
/// ```
#[async_trait]
pub trait SessionVerifierClient: Send + Sync {
    /// Verify the session identified by `credential`.
    ///
    /// Issues at most one request per call. Transport failures are folded
    /// into [`VerificationOutcome::Indeterminate`] or
    /// [`VerificationOutcome::Rejected`] rather than returned as errors.
    async fn verify(&self, credential: &SessionCredential) -> VerificationOutcome;
}
