//! Domain layer for the access gate.

pub mod classify;
pub mod error;
pub mod navigation;
pub mod route_policy;
pub mod service;

pub use classify::{TransportFailure, VerifyResponse, classify};
pub use error::ConfigError;
pub use navigation::{Navigation, NavigationTracker};
pub use route_policy::{AccessRequirement, RoutePolicy};
pub use service::{AccessGate, Evaluation, GateState};
