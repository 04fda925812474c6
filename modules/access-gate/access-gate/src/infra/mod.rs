//! Infrastructure adapters: session storage and the HTTP verifier.

pub mod http_verifier;
pub mod storage;
