//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to a sign-in action carrying the runtime
//! configuration, the sign-in request and the optional follow-up fetch.

use crate::cli::actions::{sign_in::Args, Action};
use crate::cli::commands::{
    backend, providers,
    sign_in::{self, CMD_LOGIN, CMD_SOCIAL},
};
use anyhow::{bail, Result};
use clap::ArgMatches;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((CMD_LOGIN, sub)) => sign_in_action(sub, sign_in::credentials(sub)?),
        Some((CMD_SOCIAL, sub)) => sign_in_action(sub, sign_in::social(sub)?),
        Some((name, _)) => bail!("unknown subcommand: {name}"),
        None => bail!("missing subcommand: {CMD_LOGIN} or {CMD_SOCIAL}"),
    }
}

fn sign_in_action(
    matches: &ArgMatches,
    request: crate::auth::types::SignInRequest,
) -> Result<Action> {
    let backend_opts = backend::Options::parse(matches)?;
    let provider_opts = providers::Options::parse(matches)?;

    let config = provider_opts.apply(backend_opts.into_config()?);

    Ok(Action::SignIn(Args {
        config,
        request,
        fetch: sign_in::fetch(matches),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{Provider, SignInRequest};
    use crate::cli::commands;
    use anyhow::anyhow;
    use secrecy::ExposeSecret;
    use std::time::Duration;

    const ENV_CLEAR: [(&str, Option<&str>); 9] = [
        ("SOUNDGATE_BACKEND_URL", None),
        ("SOUNDGATE_SESSION_SECRET", None),
        ("SOUNDGATE_GITHUB_ID", None),
        ("SOUNDGATE_GITHUB_SECRET", None),
        ("SOUNDGATE_GOOGLE_ID", None),
        ("SOUNDGATE_GOOGLE_SECRET", None),
        ("SOUNDGATE_FACEBOOK_ID", None),
        ("SOUNDGATE_FACEBOOK_SECRET", None),
        ("SOUNDGATE_IDENTITY_TOKEN", None),
    ];

    fn dispatch(args: &[&str]) -> Result<Args> {
        let matches = commands::new().try_get_matches_from(args)?;
        match handler(&matches)? {
            Action::SignIn(args) => Ok(args),
        }
    }

    #[test]
    fn login_builds_credentials_request() -> Result<()> {
        temp_env::with_vars(ENV_CLEAR, || -> Result<()> {
            let args = dispatch(&[
                "soundgate",
                "login",
                "--backend-url",
                "http://localhost:8000",
                "--username",
                "alice",
                "--password",
                "p@ss",
                "--fetch",
                "/api/v1/tracks",
                "--timeout-seconds",
                "3",
            ])?;

            let SignInRequest::Credentials(credentials) = args.request else {
                return Err(anyhow!("expected credentials request"));
            };
            assert_eq!(credentials.username, "alice");
            assert_eq!(credentials.password.expose_secret(), "p@ss");
            assert_eq!(args.fetch.as_deref(), Some("/api/v1/tracks"));
            assert_eq!(args.config.backend_url.as_str(), "http://localhost:8000/");
            assert_eq!(args.config.request_timeout, Duration::from_secs(3));
            assert!(args.config.providers.enabled().is_empty());
            assert!(args.config.session_secret.is_none());
            Ok(())
        })
    }

    #[test]
    fn social_reads_providers_from_env() -> Result<()> {
        temp_env::with_vars(
            [
                ("SOUNDGATE_BACKEND_URL", Some("https://api.soundgate.tld")),
                ("SOUNDGATE_SESSION_SECRET", Some("signing")),
                ("SOUNDGATE_GITHUB_ID", Some("gh-id")),
                ("SOUNDGATE_GITHUB_SECRET", Some("gh-secret")),
                ("SOUNDGATE_GOOGLE_ID", Some("")),
                ("SOUNDGATE_GOOGLE_SECRET", None),
                ("SOUNDGATE_FACEBOOK_ID", None),
                ("SOUNDGATE_FACEBOOK_SECRET", None),
                ("SOUNDGATE_IDENTITY_TOKEN", Some("gho_token")),
            ],
            || -> Result<()> {
                let args = dispatch(&["soundgate", "social", "--provider", "github"])?;

                let SignInRequest::Social {
                    provider,
                    identity_token,
                } = args.request
                else {
                    return Err(anyhow!("expected social request"));
                };
                assert_eq!(provider, "github");
                assert_eq!(identity_token.expose_secret(), "gho_token");
                assert_eq!(args.config.providers.enabled(), vec![Provider::Github]);
                assert_eq!(
                    args.config
                        .providers
                        .credentials(Provider::Github)
                        .map(|c| c.client_id.clone()),
                    Some("gh-id".to_string())
                );
                assert!(args.config.session_secret.is_some());
                assert!(args.fetch.is_none());
                Ok(())
            },
        )
    }

    #[test]
    fn half_configured_provider_is_an_error() {
        temp_env::with_vars(ENV_CLEAR, || {
            let err = dispatch(&[
                "soundgate",
                "social",
                "--backend-url",
                "http://localhost:8000",
                "--provider",
                "github",
                "--identity-token",
                "gho_token",
                "--github-client-id",
                "gh-id",
            ])
            .err();
            assert!(err.is_some_and(|e| e
                .to_string()
                .contains("missing required argument: --github-client-secret")));
        });
    }

    #[test]
    fn invalid_backend_url_is_an_error() {
        temp_env::with_vars(ENV_CLEAR, || {
            let err = dispatch(&[
                "soundgate",
                "login",
                "--backend-url",
                "ftp://backend.tld",
                "--username",
                "alice",
                "--password",
                "p@ss",
            ])
            .err();
            assert!(err.is_some_and(|e| e.to_string().contains("SOUNDGATE_BACKEND_URL")));
        });
    }
}
