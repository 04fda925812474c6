//! Session verifier backed by an HTTP call to the backend.

use std::error::Error as StdError;
use std::io;

use access_gate_sdk::{SessionCredential, SessionVerifierClient, VerificationOutcome};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Uri, header};
use http_body_util::{BodyExt, Empty};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::config::AccessGateConfig;
use crate::domain::{ConfigError, TransportFailure, VerifyResponse, classify};

/// Verifies sessions with a `GET` to the backend's verification endpoint.
///
/// The credential goes out as the `Cookie` header. A 2xx answer is parsed as
/// `{ success, isAuthenticated, admin? }`; everything else is reported as a
/// [`TransportFailure`] and classified.
pub struct HttpSessionVerifier {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    verify_uri: Uri,
}

impl HttpSessionVerifier {
    /// Build a verifier for the endpoint named in `cfg`.
    ///
    /// # Errors
    ///
    /// - `InvalidBackendUrl` if `backend_url` + `verify_path` is not an absolute URL
    /// - `Tls` if the TLS client configuration cannot be built
    pub fn new(cfg: &AccessGateConfig) -> Result<Self, ConfigError> {
        let url = cfg.verify_url();
        let verify_uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| {
            ConfigError::InvalidBackendUrl {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;
        if verify_uri.scheme().is_none() || verify_uri.authority().is_none() {
            return Err(ConfigError::InvalidBackendUrl {
                url,
                reason: "scheme and host are required".to_owned(),
            });
        }

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::aws_lc_rs::default_provider())
            .map_err(|e| ConfigError::Tls(e.to_string()))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self { client, verify_uri })
    }

    /// Endpoint this verifier calls.
    #[must_use]
    pub fn verify_uri(&self) -> &Uri {
        &self.verify_uri
    }

    /// Perform the round trip without classifying it.
    ///
    /// # Errors
    ///
    /// Returns the [`TransportFailure`] observed: non-2xx status, connection
    /// failure, or an undecodable body.
    pub async fn fetch(
        &self,
        credential: &SessionCredential,
    ) -> Result<VerifyResponse, TransportFailure> {
        let mut builder = Request::get(self.verify_uri.clone())
            .header(header::ACCEPT, "application/json");
        if let Some(cookie) = credential.cookie_header() {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder
            .body(Empty::<Bytes>::new())
            .map_err(|e| TransportFailure::Other(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| request_failure(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure::Status(status.as_u16()));
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportFailure::Other(e.to_string()))?
            .to_bytes();

        serde_json::from_slice(&body).map_err(|e| TransportFailure::Malformed(e.to_string()))
    }
}

/// Map a client error to the failure the classifier understands.
fn request_failure(err: &hyper_util::client::legacy::Error) -> TransportFailure {
    if !err.is_connect() {
        return TransportFailure::Other(err.to_string());
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return connect_failure(io_err.kind());
        }
        source = cause.source();
    }
    TransportFailure::Unreachable
}

/// Connect-phase I/O failure. DNS and routing errors surface as kinds other
/// than refusal or timeout.
fn connect_failure(kind: io::ErrorKind) -> TransportFailure {
    match kind {
        io::ErrorKind::ConnectionRefused => TransportFailure::ConnectionRefused,
        io::ErrorKind::TimedOut => TransportFailure::Timeout,
        _ => TransportFailure::Unreachable,
    }
}

#[async_trait]
impl SessionVerifierClient for HttpSessionVerifier {
    async fn verify(&self, credential: &SessionCredential) -> VerificationOutcome {
        let result = self.fetch(credential).await;
        if let Err(failure) = &result {
            debug!(?failure, uri = %self.verify_uri, "Session verification request failed");
        }
        let outcome = classify(result);
        debug!(?outcome, "Session verification classified");
        outcome
    }
}
