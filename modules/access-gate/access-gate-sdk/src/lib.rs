//! Access Gate SDK
//!
//! This crate provides the public contract of the admin access gate:
//!
//! - [`SessionStore`] - Durable slot holding the last known [`AuthRecord`]
//! - [`SessionVerifierClient`] - Remote session check against the authoritative backend
//! - [`VerificationOutcome`] - Classified result of one remote check
//! - [`AuthorizationVerdict`] / [`GateOutcome`] / [`GateDecision`] - What the gate exposes
//! - [`AccessGateError`] / [`SessionStoreError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use access_gate_sdk::{SessionCredential, SessionVerifierClient};
//!
//! let outcome = verifier.verify(&SessionCredential::cookie("sid=abc")).await;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod store;

// Re-export main types at crate root
pub use api::SessionVerifierClient;
pub use error::{AccessGateError, SessionStoreError};
pub use models::{
    AuthRecord, AuthorizationVerdict, GateDecision, GateOutcome, IndeterminateReason,
    SessionCredential, VerificationOutcome,
};
pub use store::SessionStore;
