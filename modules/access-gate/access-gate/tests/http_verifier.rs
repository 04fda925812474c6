#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `HttpSessionVerifier` against a mock backend, and the gate end to end
//! over HTTP.

use std::sync::Arc;

use access_gate::{AccessGate, AccessGateConfig, Evaluation, HttpSessionVerifier, MemorySessionStore};
use access_gate_sdk::{
    AuthRecord, AuthorizationVerdict, IndeterminateReason, SessionCredential,
    SessionVerifierClient, VerificationOutcome,
};
use httpmock::prelude::*;
use serde_json::json;

const VERIFY_PATH: &str = "/api/admin/verify";

fn config_for(base_url: String) -> AccessGateConfig {
    AccessGateConfig {
        backend_url: base_url,
        verify_path: VERIFY_PATH.to_owned(),
        ..AccessGateConfig::default()
    }
}

fn verifier_for(server: &MockServer) -> HttpSessionVerifier {
    HttpSessionVerifier::new(&config_for(server.base_url())).unwrap()
}

fn cookie() -> SessionCredential {
    SessionCredential::cookie("sid=abc123")
}

/// Address with nothing listening on it.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn authenticated_response_confirms_and_forwards_cookie() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(VERIFY_PATH)
                .header("cookie", "sid=abc123")
                .header("accept", "application/json");
            then.status(200).json_body(json!({
                "success": true,
                "isAuthenticated": true,
                "admin": { "name": "Alice2" }
            }));
        })
        .await;

    let outcome = verifier_for(&server).verify(&cookie()).await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        VerificationOutcome::Confirmed(Some(AuthRecord::new(json!({ "name": "Alice2" }))))
    );
}

#[tokio::test]
async fn unauthenticated_response_rejects() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(200)
                .json_body(json!({ "success": true, "isAuthenticated": false }));
        })
        .await;

    assert_eq!(
        verifier_for(&server).verify(&cookie()).await,
        VerificationOutcome::Rejected
    );
}

#[tokio::test]
async fn unsuccessful_response_rejects() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(200).json_body(json!({ "success": false }));
        })
        .await;

    assert_eq!(
        verifier_for(&server).verify(&cookie()).await,
        VerificationOutcome::Rejected
    );
}

#[tokio::test]
async fn auth_failure_statuses_reject() {
    for status in [401, 403] {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(VERIFY_PATH);
                then.status(status)
                    .json_body(json!({ "success": false, "message": "Not authenticated" }));
            })
            .await;

        assert_eq!(
            verifier_for(&server).verify(&cookie()).await,
            VerificationOutcome::Rejected,
            "status {status}"
        );
    }
}

#[tokio::test]
async fn missing_endpoint_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(404);
        })
        .await;

    assert_eq!(
        verifier_for(&server).verify(&cookie()).await,
        VerificationOutcome::Indeterminate(IndeterminateReason::EndpointUnavailable)
    );
}

#[tokio::test]
async fn refused_connection_is_unavailable() {
    let verifier = HttpSessionVerifier::new(&config_for(closed_port_url())).unwrap();

    assert_eq!(
        verifier.verify(&cookie()).await,
        VerificationOutcome::Indeterminate(IndeterminateReason::EndpointUnavailable)
    );
}

#[tokio::test]
async fn unresolvable_host_is_network_unreachable() {
    // `.invalid` never resolves.
    let verifier =
        HttpSessionVerifier::new(&config_for("http://backend.nonexistent.invalid".to_owned()))
            .unwrap();

    assert_eq!(
        verifier.verify(&cookie()).await,
        VerificationOutcome::Indeterminate(IndeterminateReason::NetworkUnreachable)
    );
}

#[tokio::test]
async fn server_error_and_malformed_body_are_other_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(500);
        })
        .await;
    assert_eq!(
        verifier_for(&server).verify(&cookie()).await,
        VerificationOutcome::Indeterminate(IndeterminateReason::OtherError)
    );

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(200).body("<html>maintenance</html>");
        })
        .await;
    assert_eq!(
        verifier_for(&server).verify(&cookie()).await,
        VerificationOutcome::Indeterminate(IndeterminateReason::OtherError)
    );
}

#[test]
fn relative_backend_url_is_rejected() {
    let result = HttpSessionVerifier::new(&config_for("localhost".to_owned()));
    assert!(result.is_err());
}

#[tokio::test]
async fn gate_over_http_denies_and_clears_on_401() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(401);
        })
        .await;

    let cfg = config_for(server.base_url());
    let store = Arc::new(MemorySessionStore::with_record(AuthRecord::new(
        json!({ "name": "Alice" }),
    )));
    let gate = AccessGate::new(
        store.clone(),
        Arc::new(HttpSessionVerifier::new(&cfg).unwrap()),
        &cfg,
    )
    .unwrap();

    let nav = gate.begin("/admin");
    let Evaluation::Committed(outcome) = gate.evaluate(nav, &cookie()).await else {
        panic!("navigation superseded");
    };

    mock.assert_async().await;
    assert_eq!(outcome.verdict, AuthorizationVerdict::Denied);
    assert_eq!(store.snapshot(), None);
}

#[tokio::test]
async fn gate_over_http_fails_open_on_404() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(404);
        })
        .await;

    let cfg = config_for(server.base_url());
    let cached = AuthRecord::new(json!({ "name": "Alice" }));
    let store = Arc::new(MemorySessionStore::with_record(cached.clone()));
    let gate = AccessGate::new(
        store.clone(),
        Arc::new(HttpSessionVerifier::new(&cfg).unwrap()),
        &cfg,
    )
    .unwrap();

    let decision = gate.guard("/admin", &cookie(), "dashboard").await;

    assert_eq!(
        decision,
        Some(access_gate_sdk::GateDecision::Render("dashboard"))
    );
    assert_eq!(store.snapshot(), Some(cached));
}
