use crate::{auth::verifier::GITHUB_API_URL, config::AuthConfig};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;

pub const ARG_BACKEND_URL: &str = "backend-url";
pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_GITHUB_API_URL: &str = "github-api-url";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";

#[derive(Debug)]
pub struct Options {
    pub backend_url: String,
    pub session_secret: Option<SecretString>,
    pub github_api_url: String,
    pub timeout_seconds: u64,
}

impl Options {
    /// Parse backend arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let backend_url = matches
            .get_one::<String>(ARG_BACKEND_URL)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_BACKEND_URL}"))?;

        let session_secret = matches
            .get_one::<String>(ARG_SESSION_SECRET)
            .filter(|v| !v.trim().is_empty())
            .map(|v| SecretString::from(v.clone()));

        Ok(Self {
            backend_url,
            session_secret,
            github_api_url: matches
                .get_one::<String>(ARG_GITHUB_API_URL)
                .cloned()
                .unwrap_or_else(|| GITHUB_API_URL.to_string()),
            timeout_seconds: matches
                .get_one::<u64>(ARG_TIMEOUT_SECONDS)
                .copied()
                .unwrap_or(10),
        })
    }

    /// Build the runtime configuration, without providers.
    ///
    /// # Errors
    /// Returns an error if one of the URLs is not a usable http(s) URL.
    pub fn into_config(self) -> Result<AuthConfig> {
        let mut config = AuthConfig::new(&self.backend_url)
            .context("invalid SOUNDGATE_BACKEND_URL")?
            .with_github_api_url(&self.github_api_url)
            .context("invalid SOUNDGATE_GITHUB_API_URL")?
            .with_request_timeout(Duration::from_secs(self.timeout_seconds));

        if let Some(secret) = self.session_secret {
            config = config.with_session_secret(secret);
        }

        Ok(config)
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BACKEND_URL)
                .long("backend-url")
                .help("Streaming backend base URL, example: https://api.soundgate.tld")
                .env("SOUNDGATE_BACKEND_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long("session-secret")
                .help("Session signing secret")
                .env("SOUNDGATE_SESSION_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_GITHUB_API_URL)
                .long("github-api-url")
                .help("GitHub API base URL used to verify identity tokens")
                .env("SOUNDGATE_GITHUB_API_URL")
                .default_value(GITHUB_API_URL),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long("timeout-seconds")
                .help("Timeout in seconds for every outbound request")
                .env("SOUNDGATE_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
