//! The access gate service.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use access_gate_sdk::{
    AccessGateError, AuthRecord, AuthorizationVerdict, GateDecision, GateOutcome,
    IndeterminateReason, SessionCredential, SessionStore, SessionVerifierClient, VerificationOutcome,
};
use futures::FutureExt;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::{AccessGateConfig, FailMode, FailurePolicy};

use super::error::ConfigError;
use super::navigation::{Navigation, NavigationTracker};
use super::route_policy::{AccessRequirement, RoutePolicy};

/// Verdict currently exposed for the latest navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateState {
    /// Target of the navigation the verdict belongs to. `None` before the
    /// first navigation.
    pub target: Option<String>,
    pub verdict: AuthorizationVerdict,
}

/// Result of evaluating one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The navigation was still current; its outcome has been committed.
    Committed(GateOutcome),
    /// A newer navigation started while this one was verifying. Nothing was
    /// committed.
    Superseded,
}

/// Authorization gate for protected navigations.
///
/// For every navigation into a protected area the gate:
/// 1. Publishes `Pending`
/// 2. Reads the session cache; an empty cache denies without a network call
/// 3. Verifies the session with the backend (bounded by a timeout)
/// 4. Refreshes or clears the cache and publishes the terminal verdict,
///    unless a newer navigation has started in the meantime
///
/// Verdicts are never reused across navigations; only the cached record is.
pub struct AccessGate {
    store: Arc<dyn SessionStore>,
    verifier: Arc<dyn SessionVerifierClient>,
    routes: RoutePolicy,
    policy: FailurePolicy,
    verify_timeout: Duration,
    login_path: String,
    return_param: String,
    tracker: NavigationTracker,
    state: watch::Sender<GateState>,
}

impl AccessGate {
    /// Build a gate from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRoute`] if a route pattern is invalid.
    pub fn new(
        store: Arc<dyn SessionStore>,
        verifier: Arc<dyn SessionVerifierClient>,
        cfg: &AccessGateConfig,
    ) -> Result<Self, ConfigError> {
        if cfg.failure_policy.fails_open() {
            warn!(
                policy = ?cfg.failure_policy,
                "Access gate fails open: inconclusive session checks grant access \
                 to holders of a cached admin record. Review before production use."
            );
        }

        let (state, _) = watch::channel(GateState {
            target: None,
            verdict: AuthorizationVerdict::Pending,
        });

        Ok(Self {
            store,
            verifier,
            routes: RoutePolicy::from_config(cfg)?,
            policy: cfg.failure_policy,
            verify_timeout: cfg.verify_timeout(),
            login_path: cfg.login_path.clone(),
            return_param: cfg.return_param.clone(),
            tracker: NavigationTracker::new(),
            state,
        })
    }

    /// Watch the verdict of the latest navigation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    /// Current verdict of the latest navigation.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    /// Whether `target` is a protected area.
    #[must_use]
    pub fn requirement(&self, target: &str) -> AccessRequirement {
        self.routes.resolve(target)
    }

    /// Start a navigation to `target`. Supersedes any navigation still in
    /// flight and publishes `Pending`.
    #[must_use]
    pub fn begin(&self, target: impl Into<String>) -> Navigation {
        let nav = self.tracker.begin(target);
        self.state.send_replace(GateState {
            target: Some(nav.target().to_owned()),
            verdict: AuthorizationVerdict::Pending,
        });
        nav
    }

    /// Evaluate a navigation started with [`AccessGate::begin`].
    ///
    /// Always resolves: store and verifier failures turn into verdicts.
    /// Returns [`Evaluation::Superseded`] without touching the cache when a
    /// newer navigation started before verification finished.
    #[tracing::instrument(skip_all, fields(route = %nav.target(), epoch = nav.epoch()))]
    pub async fn evaluate(&self, nav: Navigation, credential: &SessionCredential) -> Evaluation {
        if self.routes.resolve(nav.target()) == AccessRequirement::Public {
            debug!("Public route, no session check");
            return self.commit(&nav, GateOutcome::granted());
        }

        let cached = match self.store.read().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return self.commit(&nav, GateOutcome::denied(AccessGateError::CacheMiss));
            }
            Err(e) => {
                error!(error = %e, "Session cache read failed, treating as empty");
                return self.commit(&nav, GateOutcome::denied(AccessGateError::from(e)));
            }
        };

        let outcome = self.verify(credential).await;

        if !self.tracker.is_current(&nav) {
            debug!(?outcome, "Navigation superseded, dropping verification result");
            return Evaluation::Superseded;
        }

        let resolved = match outcome {
            VerificationOutcome::Confirmed(profile) => {
                self.refresh(profile.unwrap_or(cached)).await;
                GateOutcome::granted()
            }
            VerificationOutcome::Rejected => {
                self.invalidate().await;
                GateOutcome::denied(AccessGateError::SessionRejected)
            }
            VerificationOutcome::Indeterminate(reason) => {
                let cause = AccessGateError::from_indeterminate(reason);
                match self.policy.mode_for(reason) {
                    FailMode::Open => {
                        warn!(%reason, "Session check inconclusive, trusting cached record");
                        GateOutcome::granted_despite(cause)
                    }
                    FailMode::Closed => {
                        warn!(%reason, "Session check inconclusive, denying");
                        GateOutcome::denied(cause)
                    }
                }
            }
        };

        self.commit(&nav, resolved)
    }

    /// Run a full navigation and map the verdict to a render decision.
    ///
    /// Returns `None` if the navigation was superseded before it resolved.
    pub async fn guard<C>(
        &self,
        target: &str,
        credential: &SessionCredential,
        content: C,
    ) -> Option<GateDecision<C>> {
        let nav = self.begin(target);
        match self.evaluate(nav, credential).await {
            Evaluation::Committed(outcome) => Some(self.decide(outcome.verdict, target, content)),
            Evaluation::Superseded => None,
        }
    }

    /// Map a verdict for `target` to what the router should do.
    #[must_use]
    pub fn decide<C>(
        &self,
        verdict: AuthorizationVerdict,
        target: &str,
        content: C,
    ) -> GateDecision<C> {
        match verdict {
            AuthorizationVerdict::Pending => GateDecision::Loading,
            AuthorizationVerdict::Granted => GateDecision::Render(content),
            AuthorizationVerdict::Denied => GateDecision::Redirect {
                location: self.login_location(target),
                return_to: target.to_owned(),
            },
        }
    }

    /// Login entry point carrying `target` for the post-login return.
    #[must_use]
    pub fn login_location(&self, target: &str) -> String {
        format!(
            "{}?{}={}",
            self.login_path,
            self.return_param,
            urlencoding::encode(target)
        )
    }

    /// Run the verifier under the timeout. A verifier that panics is treated
    /// like any other verification fault.
    async fn verify(&self, credential: &SessionCredential) -> VerificationOutcome {
        let call = AssertUnwindSafe(self.verifier.verify(credential)).catch_unwind();
        match tokio::time::timeout(self.verify_timeout, call).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => {
                error!("Session verifier panicked");
                VerificationOutcome::Indeterminate(IndeterminateReason::OtherError)
            }
            Err(_) => {
                warn!(timeout = ?self.verify_timeout, "Session verification timed out");
                VerificationOutcome::Indeterminate(IndeterminateReason::OtherError)
            }
        }
    }

    async fn refresh(&self, record: AuthRecord) {
        if let Err(e) = self.store.write(&record).await {
            warn!(error = %e, "Failed to refresh cached session record");
        }
    }

    async fn invalidate(&self) {
        if let Err(e) = self.store.clear().await {
            error!(error = %e, "Failed to clear rejected session record");
        }
    }

    fn commit(&self, nav: &Navigation, outcome: GateOutcome) -> Evaluation {
        // Checked under the channel lock so a concurrent `begin` cannot be
        // overwritten by a verdict for the route it replaced.
        let published = self.state.send_if_modified(|state| {
            if !self.tracker.is_current(nav) {
                return false;
            }
            *state = GateState {
                target: Some(nav.target().to_owned()),
                verdict: outcome.verdict,
            };
            true
        });
        if !published {
            return Evaluation::Superseded;
        }

        info!(
            verdict = ?outcome.verdict,
            cause = outcome.cause.as_ref().map(tracing::field::display),
            "Access gate resolved"
        );
        Evaluation::Committed(outcome)
    }
}
