//! Username/password exchange against the backend login endpoint.
//! One shot per user action: a failed exchange is returned, never retried.

use crate::auth::{
    envelope::decode_token_pair,
    error::{AuthError, INVALID_CREDENTIALS},
    transport::{build_url, BackendRequest, Transport},
    types::{Credentials, TokenPair},
    LOGIN_PATH,
};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, instrument};

#[derive(Clone, Debug)]
pub struct CredentialExchanger<T> {
    transport: T,
    login_url: String,
}

impl<T: Transport> CredentialExchanger<T> {
    pub fn new(transport: T, backend_url: &str) -> Self {
        Self {
            transport,
            login_url: build_url(backend_url, LOGIN_PATH),
        }
    }

    /// Exchanges credentials for a backend token pair.
    ///
    /// # Errors
    /// `InvalidInput` for an empty username or password (no request is sent),
    /// `AuthenticationRejected` when the backend refuses the credentials, and
    /// `UpstreamUnavailable` when the backend cannot be reached.
    #[instrument(skip_all)]
    pub async fn exchange(&self, credentials: &Credentials) -> Result<TokenPair, AuthError> {
        if credentials.username.trim().is_empty() {
            return Err(AuthError::InvalidInput("username is required".to_string()));
        }
        if credentials.password.expose_secret().is_empty() {
            return Err(AuthError::InvalidInput("password is required".to_string()));
        }

        let payload = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });

        debug!("login URL: {}", self.login_url);

        let reply = self
            .transport
            .send(BackendRequest::post(self.login_url.as_str(), payload))
            .await?;

        decode_token_pair(reply, INVALID_CREDENTIALS)
    }
}
