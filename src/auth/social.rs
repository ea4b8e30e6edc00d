//! Social identity exchange. One code path serves every provider; the provider
//! only changes the `type` field sent to the backend. Which providers are
//! accepted is configuration.

use crate::auth::{
    envelope::decode_token_pair,
    error::AuthError,
    transport::{build_url, BackendRequest, Transport},
    types::{IdentityClaim, Provider, TokenPair},
    SOCIAL_LOGIN_PATH,
};
use regex::Regex;
use serde_json::json;
use std::{collections::BTreeSet, sync::LazyLock};
use tracing::{debug, instrument};

const SOCIAL_REJECTED: &str = "social sign-in was rejected";

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

#[derive(Clone, Debug)]
pub struct SocialIdentityBridge<T> {
    transport: T,
    social_url: String,
    enabled: BTreeSet<Provider>,
}

impl<T: Transport> SocialIdentityBridge<T> {
    pub fn new(
        transport: T,
        backend_url: &str,
        enabled: impl IntoIterator<Item = Provider>,
    ) -> Self {
        Self {
            transport,
            social_url: build_url(backend_url, SOCIAL_LOGIN_PATH),
            enabled: enabled.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self, provider: Provider) -> bool {
        self.enabled.contains(&provider)
    }

    /// Exchanges a verified identity claim for a backend token pair.
    /// Repeated calls are safe and may each return a fresh pair.
    ///
    /// # Errors
    /// `InvalidInput` for a disabled provider or an unusable email (no request is
    /// sent), otherwise the same rejection/unavailable split as the credential
    /// exchange.
    #[instrument(skip_all, fields(provider = %claim.provider))]
    pub async fn exchange(&self, claim: &IdentityClaim) -> Result<TokenPair, AuthError> {
        if !self.is_enabled(claim.provider) {
            return Err(AuthError::InvalidInput(format!(
                "provider {} is not enabled",
                claim.provider
            )));
        }

        let email = claim.email.trim();
        if email.is_empty() {
            return Err(AuthError::InvalidInput("email is required".to_string()));
        }
        if !valid_email(email) {
            return Err(AuthError::InvalidInput(
                "email is not a valid address".to_string(),
            ));
        }

        let payload = json!({
            "type": claim.provider.as_str(),
            "username": email,
        });

        debug!("social login URL: {}", self.social_url);

        let reply = self
            .transport
            .send(BackendRequest::post(self.social_url.as_str(), payload))
            .await?;

        decode_token_pair(reply, SOCIAL_REJECTED)
    }
}

pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::transport::{HttpTransport, DEFAULT_TIMEOUT};
    use anyhow::{anyhow, Result};
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn bridge(uri: &str) -> Result<SocialIdentityBridge<HttpTransport>> {
        Ok(SocialIdentityBridge::new(
            HttpTransport::new(DEFAULT_TIMEOUT)?,
            uri,
            [Provider::Github],
        ))
    }

    fn github_claim(email: &str) -> IdentityClaim {
        IdentityClaim {
            provider: Provider::Github,
            email: email.to_string(),
        }
    }

    #[test]
    fn test_valid_email() {
        assert!(valid_email("bob@x.com"));
        assert!(!valid_email("bob"));
        assert!(!valid_email("bob @x.com"));
    }

    #[tokio::test]
    async fn exchange_sends_upper_case_provider() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/social-media"))
            .and(body_json(json!({"type": "GITHUB", "username": "bob@x.com"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {
                    "accessToken": "A2",
                    "refreshToken": "R2",
                    "user": {"_id": "u-2", "username": "bob@x.com", "type": "GITHUB"}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let pair = bridge(&server.uri())?
            .exchange(&github_claim("bob@x.com"))
            .await?;
        assert_eq!(pair.access_token, "A2");
        assert_eq!(pair.user.account_type.as_deref(), Some("GITHUB"));
        Ok(())
    }

    #[tokio::test]
    async fn exchange_is_repeatable() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/social-media"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"accessToken": "A2", "refreshToken": "R2", "user": {}}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let bridge = bridge(&server.uri())?;
        let first = bridge.exchange(&github_claim("bob@x.com")).await?;
        let second = bridge.exchange(&github_claim("bob@x.com")).await?;
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn exchange_maps_null_data_to_rejection() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/social-media"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .mount(&server)
            .await;

        let err = bridge(&server.uri())?
            .exchange(&github_claim("bob@x.com"))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, AuthError::AuthenticationRejected(_)));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_claims_never_reach_the_backend() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let bridge = bridge(&server.uri())?;

        let err = bridge.exchange(&github_claim("")).await;
        assert_eq!(
            err.err(),
            Some(AuthError::InvalidInput("email is required".to_string()))
        );

        let err = bridge.exchange(&github_claim("bob.x.com")).await;
        assert_eq!(
            err.err(),
            Some(AuthError::InvalidInput(
                "email is not a valid address".to_string()
            ))
        );

        let err = bridge
            .exchange(&IdentityClaim {
                provider: Provider::Google,
                email: "bob@x.com".to_string(),
            })
            .await;
        assert_eq!(
            err.err(),
            Some(AuthError::InvalidInput(
                "provider GOOGLE is not enabled".to_string()
            ))
        );
        Ok(())
    }
}
