//! Access Gate
//!
//! Decides whether a navigation into a protected admin area may proceed.
//! The gate reconciles the locally cached admin record with a remote
//! session check and always resolves to a terminal verdict.
//!
//! ```ignore
//! let gate = AccessGate::new(store, verifier, &cfg)?;
//! match gate.guard("/admin/posts", &credential, page).await {
//!     Some(GateDecision::Render(page)) => render(page),
//!     Some(GateDecision::Redirect { location, .. }) => navigate(&location),
//!     Some(GateDecision::Loading) | None => {}
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{AccessGateConfig, FailMode, FailurePolicy, StorageConfig};
pub use domain::{AccessGate, Evaluation, GateState, Navigation};
pub use infra::http_verifier::HttpSessionVerifier;
pub use infra::storage::{FileSessionStore, MemorySessionStore};
