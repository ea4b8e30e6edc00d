//! The request capability the sign-in flows depend on.
//!
//! Exchangers, the verifier and the API client talk to HTTP only through
//! [`Transport`], so tests can swap in a recording fake. [`HttpTransport`] is the
//! production implementation: JSON bodies, the crate user agent, an optional
//! bearer header and a fixed per-request timeout. Timeouts and retries are
//! transport policy; callers above this layer never retry.

use crate::{auth::error::TransportError, APP_USER_AGENT};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, info_span, Instrument};

/// Default request timeout applied by [`HttpTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of characters kept from a non-JSON error body.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug)]
pub struct BackendRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub bearer: Option<SecretString>,
}

impl BackendRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
            bearer: None,
        }
    }

    #[must_use]
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            body: Some(body),
            bearer: None,
        }
    }

    #[must_use]
    pub fn with_bearer(mut self, token: SecretString) -> Self {
        self.bearer = Some(token);
        self
    }
}

/// Status plus decoded body. Empty bodies decode to `Value::Null`; bodies that
/// are not JSON are kept as a trimmed string.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendReply {
    pub status: u16,
    pub body: Value,
}

impl BackendReply {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

pub trait Transport: Send + Sync {
    /// Send one request and return whatever the server answered.
    ///
    /// # Errors
    /// Returns a [`TransportError`] only when no HTTP reply was received.
    fn send(
        &self,
        request: BackendRequest,
    ) -> impl Future<Output = Result<BackendReply, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: BackendRequest,
    ) -> impl Future<Output = Result<BackendReply, TransportError>> + Send {
        (**self).send(request)
    }
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Request(format!("Failed to build client: {err}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: BackendRequest) -> Result<BackendReply, TransportError> {
        let span = info_span!(
            "backend.request",
            http.method = %request.method,
            url = %request.url
        );

        let mut builder = self.client.request(request.method, &request.url);

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(map_request_error)?;

        debug!("backend replied with status {}", status);

        Ok(BackendReply {
            status,
            body: decode_body(&text),
        })
    }
}

/// Joins the backend base URL and an API path without doubling slashes.
#[must_use]
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn decode_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    serde_json::from_str(trimmed)
        .unwrap_or_else(|_| Value::String(trimmed.chars().take(MAX_ERROR_CHARS).collect()))
}

fn map_request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_builder() {
        TransportError::Request(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn build_url_trims_slashes() {
        assert_eq!(
            build_url("http://backend.tld:8000/", "/api/v1/auth/login"),
            "http://backend.tld:8000/api/v1/auth/login"
        );
        assert_eq!(build_url("", "/api/v1/tracks"), "/api/v1/tracks");
    }

    #[test]
    fn decode_body_handles_empty_and_plain_text() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("  \n"), Value::Null);
        assert_eq!(decode_body("{\"data\":null}"), json!({"data": null}));
        assert_eq!(decode_body(" Bad Gateway "), json!("Bad Gateway"));
    }

    #[test]
    fn reply_status_classes() {
        let reply = |status| BackendReply {
            status,
            body: Value::Null,
        };
        assert!(reply(201).is_success());
        assert!(reply(401).is_client_error());
        assert!(reply(503).is_server_error());
        assert!(!reply(302).is_success());
    }

    #[tokio::test]
    async fn sends_json_body_and_bearer() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/echo"))
            .and(header("Authorization", "Bearer A1"))
            .and(body_json(json!({"hello": "world"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(DEFAULT_TIMEOUT)?;
        let request = BackendRequest::post(
            build_url(&server.uri(), "/api/v1/echo"),
            json!({"hello": "world"}),
        )
        .with_bearer(SecretString::from("A1".to_string()));

        let reply = transport.send(request).await?;
        assert_eq!(reply.status, 201);
        assert_eq!(reply.body, json!({"data": 1}));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);

        let transport = HttpTransport::new(DEFAULT_TIMEOUT)?;
        let result = transport
            .send(BackendRequest::get(format!("http://127.0.0.1:{port}/")))
            .await;

        assert!(matches!(result, Err(TransportError::Network(_))));
        Ok(())
    }
}
