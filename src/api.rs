//! Authenticated resource calls against the backend (tracks, playlists, likes).
//! The client reads the access token from the session store for every request
//! and never writes session state: a refused token is reported as
//! `AuthorizationExpired` and the caller decides whether to sign out.

use crate::{
    auth::{
        envelope::{reply_message, BackendResponse},
        error::AuthError,
        session::SessionStore,
        transport::{build_url, BackendRequest, Transport},
    },
    config::AuthConfig,
};
use secrecy::SecretString;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    transport: T,
    backend_url: String,
    store: SessionStore,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: &AuthConfig, store: SessionStore) -> Self {
        Self {
            transport,
            backend_url: config.backend_url.to_string(),
            store,
        }
    }

    /// GET `path` and decode the envelope's `data`.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, AuthError> {
        let request = BackendRequest::get(build_url(&self.backend_url, path));
        self.send(request).await
    }

    /// POST `body` to `path` and decode the envelope's `data`.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn post_json<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AuthError> {
        let body = serde_json::to_value(body).map_err(|err| {
            AuthError::InvalidInput(format!("Failed to encode request: {err}"))
        })?;
        let request = BackendRequest::post(build_url(&self.backend_url, path), body);
        self.send(request).await
    }

    /// # Errors
    /// `AuthorizationExpired` without a session or on 401, `Backend` for other
    /// 4xx replies, `UpstreamUnavailable` for transport failures, 5xx replies and
    /// bodies that do not decode.
    #[instrument(skip_all, fields(http.method = %request.method, url = %request.url))]
    async fn send<R: DeserializeOwned>(&self, request: BackendRequest) -> Result<R, AuthError> {
        let Some(session) = self.store.current_session() else {
            return Err(AuthError::AuthorizationExpired);
        };

        let request = request.with_bearer(SecretString::from(session.access_token));
        let reply = self.transport.send(request).await?;

        if reply.status == 401 {
            debug!("access token refused");
            return Err(AuthError::AuthorizationExpired);
        }

        if reply.is_server_error() {
            return Err(AuthError::UpstreamUnavailable(format!(
                "backend returned status {}",
                reply.status
            )));
        }

        if !reply.is_success() {
            return Err(AuthError::Backend {
                status: reply.status,
                message: reply_message(&reply.body).unwrap_or_else(|| "Request failed.".to_string()),
            });
        }

        let envelope: BackendResponse<Value> = serde_json::from_value(reply.body).map_err(|err| {
            AuthError::UpstreamUnavailable(format!("Failed to decode response: {err}"))
        })?;

        serde_json::from_value(envelope.data.unwrap_or(Value::Null)).map_err(|err| {
            AuthError::UpstreamUnavailable(format!("Failed to decode response: {err}"))
        })
    }
}
