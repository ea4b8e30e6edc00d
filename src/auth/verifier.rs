//! Provider collaborators that turn an opaque identity token into a verified
//! [`IdentityClaim`]. Only GitHub is wired; its identity token is a GitHub OAuth
//! access token obtained by the front end. The token is sent to GitHub and
//! nowhere else, and is never logged.

use crate::auth::{
    envelope::reply_message,
    error::AuthError,
    transport::{build_url, BackendReply, BackendRequest, Transport},
    types::{IdentityClaim, Provider},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, instrument, warn};

pub const GITHUB_API_URL: &str = "https://api.github.com";

pub trait IdentityVerifier: Send + Sync {
    /// Verify `identity_token` with `provider`.
    ///
    /// # Errors
    /// `InvalidInput` when no verifier handles `provider`,
    /// `AuthenticationRejected` when the provider refuses the token, and
    /// `UpstreamUnavailable` when the provider cannot be reached.
    fn verify(
        &self,
        provider: Provider,
        identity_token: &SecretString,
    ) -> impl Future<Output = Result<IdentityClaim, AuthError>> + Send;
}

#[derive(Deserialize)]
struct GithubUser {
    login: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    verified: bool,
}

#[derive(Clone, Debug)]
pub struct GithubVerifier<T> {
    transport: T,
    api_url: String,
}

impl<T: Transport> GithubVerifier<T> {
    pub fn new(transport: T, api_url: &str) -> Self {
        Self {
            transport,
            api_url: api_url.to_string(),
        }
    }

    async fn get(&self, path: &str, token: &SecretString) -> Result<BackendReply, AuthError> {
        let request =
            BackendRequest::get(build_url(&self.api_url, path)).with_bearer(token.clone());
        let reply = self.transport.send(request).await?;

        match reply.status {
            200..=299 => Ok(reply),
            401 | 403 => {
                debug!(
                    "github refused identity token: {}",
                    reply_message(&reply.body).unwrap_or_default()
                );
                Err(AuthError::AuthenticationRejected(
                    "github identity could not be verified".to_string(),
                ))
            }
            status => Err(AuthError::UpstreamUnavailable(format!(
                "github returned status {status}"
            ))),
        }
    }

    async fn primary_email(&self, token: &SecretString) -> Result<Option<String>, AuthError> {
        let reply = self.get("/user/emails", token).await?;
        let emails: Vec<GithubEmail> = serde_json::from_value(reply.body).map_err(|err| {
            AuthError::UpstreamUnavailable(format!("Failed to decode github emails: {err}"))
        })?;

        Ok(emails
            .into_iter()
            .find(|entry| entry.primary && entry.verified)
            .map(|entry| entry.email))
    }
}

impl<T: Transport> IdentityVerifier for GithubVerifier<T> {
    #[instrument(skip_all, fields(provider = %provider))]
    async fn verify(
        &self,
        provider: Provider,
        identity_token: &SecretString,
    ) -> Result<IdentityClaim, AuthError> {
        if provider != Provider::Github {
            return Err(AuthError::InvalidInput(format!(
                "no identity verifier for provider {provider}"
            )));
        }

        if identity_token.expose_secret().trim().is_empty() {
            return Err(AuthError::InvalidInput(
                "identity token is required".to_string(),
            ));
        }

        let reply = self.get("/user", identity_token).await?;
        let user: GithubUser = serde_json::from_value(reply.body).map_err(|err| {
            AuthError::UpstreamUnavailable(format!("Failed to decode github user: {err}"))
        })?;

        let email = match user.email.filter(|email| !email.trim().is_empty()) {
            Some(email) => Some(email),
            None => self.primary_email(identity_token).await?,
        };

        let Some(email) = email else {
            warn!(
                "github account {} has no verified primary email",
                user.login.as_deref().unwrap_or("unknown")
            );
            return Err(AuthError::AuthenticationRejected(
                "github account has no verified email".to_string(),
            ));
        };

        Ok(IdentityClaim {
            provider: Provider::Github,
            email,
        })
    }
}
