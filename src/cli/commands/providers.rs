use crate::{auth::types::Provider, config::AuthConfig};
use anyhow::{bail, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

/// Argument ids for one provider: (client-id arg, client-secret arg).
const fn arg_ids(provider: Provider) -> (&'static str, &'static str) {
    match provider {
        Provider::Github => ("github-client-id", "github-client-secret"),
        Provider::Google => ("google-client-id", "google-client-secret"),
        Provider::Facebook => ("facebook-client-id", "facebook-client-secret"),
    }
}

const fn env_names(provider: Provider) -> (&'static str, &'static str) {
    match provider {
        Provider::Github => ("SOUNDGATE_GITHUB_ID", "SOUNDGATE_GITHUB_SECRET"),
        Provider::Google => ("SOUNDGATE_GOOGLE_ID", "SOUNDGATE_GOOGLE_SECRET"),
        Provider::Facebook => ("SOUNDGATE_FACEBOOK_ID", "SOUNDGATE_FACEBOOK_SECRET"),
    }
}

#[derive(Debug)]
pub struct ProviderOptions {
    pub provider: Provider,
    pub client_id: String,
    pub client_secret: SecretString,
}

#[derive(Debug, Default)]
pub struct Options {
    pub providers: Vec<ProviderOptions>,
}

impl Options {
    /// Parse provider credentials. A provider is enabled when both its client
    /// id and secret are set.
    ///
    /// # Errors
    /// Returns an error if only one half of a pair is set.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        // Helper to filter empty strings which clap might pass through if env vars are set to ""
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let mut providers = Vec::new();

        for provider in Provider::ALL {
            let (id_arg, secret_arg) = arg_ids(provider);

            match (get_non_empty(id_arg), get_non_empty(secret_arg)) {
                (Some(client_id), Some(client_secret)) => providers.push(ProviderOptions {
                    provider,
                    client_id,
                    client_secret: SecretString::from(client_secret),
                }),
                (Some(_), None) => bail!("missing required argument: --{secret_arg}"),
                (None, Some(_)) => bail!("missing required argument: --{id_arg}"),
                (None, None) => {}
            }
        }

        Ok(Self { providers })
    }

    #[must_use]
    pub fn apply(self, config: AuthConfig) -> AuthConfig {
        self.providers.into_iter().fold(config, |config, entry| {
            config.with_provider(entry.provider, entry.client_id, entry.client_secret)
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    Provider::ALL.into_iter().fold(command, |command, provider| {
        let (id_arg, secret_arg) = arg_ids(provider);
        let (id_env, secret_env) = env_names(provider);

        command
            .arg(
                Arg::new(id_arg)
                    .long(id_arg)
                    .help(format!("{provider} OAuth client id"))
                    .env(id_env),
            )
            .arg(
                Arg::new(secret_arg)
                    .long(secret_arg)
                    .help(format!("{provider} OAuth client secret"))
                    .env(secret_env)
                    .hide_env_values(true),
            )
    })
}
