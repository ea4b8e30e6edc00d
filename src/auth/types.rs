//! Request and session types for the sign-in flows. Credentials and token pairs
//! carry secrets, so their `Debug` output never includes them.

use crate::auth::error::AuthError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Social identity providers the backend understands. The wire form is the
/// upper-case name sent as `type` to the social-login endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Github,
    Google,
    Facebook,
}

impl Provider {
    pub const ALL: [Self; 3] = [Self::Github, Self::Google, Self::Facebook];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Github => "GITHUB",
            Self::Google => "GOOGLE",
            Self::Facebook => "FACEBOOK",
        }
    }

    /// Lower-case name used for CLI flags and environment variables.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Google => "google",
            Self::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AuthError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == normalized)
            .ok_or_else(|| AuthError::InvalidInput(format!("unknown provider: {}", raw.trim())))
    }
}

/// Which path produced a sign-in outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignInMethod {
    Credentials,
    Social(Provider),
}

/// Username and password for one exchange. Never stored.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// A verified assertion of identity from a social provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub provider: Provider,
    pub email: String,
}

/// The sign-in event surface accepted by the authenticator.
#[derive(Debug)]
pub enum SignInRequest {
    Credentials(Credentials),
    Social {
        provider: String,
        identity_token: SecretString,
    },
}

impl SignInRequest {
    pub fn social(provider: impl Into<String>, identity_token: impl Into<String>) -> Self {
        Self::Social {
            provider: provider.into(),
            identity_token: SecretString::from(identity_token.into()),
        }
    }
}

/// User document returned alongside the tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verify: Option<bool>,
}

/// Backend-issued access/refresh pair. Replaced whole, never edited.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("user", &self.user.id)
            .finish()
    }
}

/// Read-only projection of the current session handed to consumers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl From<&TokenPair> for SessionView {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            user: pair.user.clone(),
        }
    }
}

impl From<TokenPair> for SessionView {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user: pair.user,
        }
    }
}

impl fmt::Debug for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionView")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("user", &self.user.id)
            .finish()
    }
}
