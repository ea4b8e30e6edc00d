//! Runtime configuration: backend base URL, the session signing secret and the
//! client id/secret pair of every enabled social provider. The secret and the
//! provider credentials are opaque here; they are carried for the layers that
//! need them and never logged.

use crate::auth::{transport::DEFAULT_TIMEOUT, types::Provider, verifier::GITHUB_API_URL};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use std::{collections::BTreeMap, time::Duration};
use url::Url;

#[derive(Clone, Debug)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Providers with configured client credentials. Only these are accepted.
#[derive(Clone, Debug, Default)]
pub struct ProviderRegistry {
    entries: BTreeMap<Provider, ProviderCredentials>,
}

impl ProviderRegistry {
    pub fn register(&mut self, provider: Provider, credentials: ProviderCredentials) {
        self.entries.insert(provider, credentials);
    }

    #[must_use]
    pub fn is_enabled(&self, provider: Provider) -> bool {
        self.entries.contains_key(&provider)
    }

    #[must_use]
    pub fn credentials(&self, provider: Provider) -> Option<&ProviderCredentials> {
        self.entries.get(&provider)
    }

    #[must_use]
    pub fn enabled(&self) -> Vec<Provider> {
        self.entries.keys().copied().collect()
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub backend_url: Url,
    pub session_secret: Option<SecretString>,
    pub providers: ProviderRegistry,
    pub github_api_url: String,
    pub request_timeout: Duration,
}

impl AuthConfig {
    /// # Errors
    /// Returns an error if `backend_url` cannot be parsed, has no host, or uses
    /// a scheme other than http(s).
    pub fn new(backend_url: &str) -> Result<Self> {
        Ok(Self {
            backend_url: parse_base_url(backend_url)?,
            session_secret: None,
            providers: ProviderRegistry::default(),
            github_api_url: GITHUB_API_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_session_secret(mut self, secret: SecretString) -> Self {
        self.session_secret = Some(secret);
        self
    }

    #[must_use]
    pub fn with_provider(
        mut self,
        provider: Provider,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        self.providers.register(
            provider,
            ProviderCredentials {
                client_id: client_id.into(),
                client_secret,
            },
        );
        self
    }

    /// # Errors
    /// Returns an error if `url` is not a usable http(s) URL.
    pub fn with_github_api_url(mut self, url: &str) -> Result<Self> {
        self.github_api_url = parse_base_url(url)?.to_string();
        Ok(self)
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
    }

    if url.host().is_none() {
        return Err(anyhow!("Error parsing URL: no host specified"));
    }

    Ok(url)
}
