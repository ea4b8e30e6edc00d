use crate::auth::types::{Credentials, SignInRequest};
use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_SOCIAL: &str = "social";

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_PROVIDER: &str = "provider";
pub const ARG_IDENTITY_TOKEN: &str = "identity-token";
pub const ARG_FETCH: &str = "fetch";

/// Build the sign-in request for the `login` subcommand.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn credentials(matches: &ArgMatches) -> Result<SignInRequest> {
    let read = |id: &str| -> Result<String> {
        matches
            .get_one::<String>(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
    };

    // emptiness is checked by the exchanger
    Ok(SignInRequest::Credentials(Credentials::new(
        read(ARG_USERNAME)?,
        read(ARG_PASSWORD)?,
    )))
}

/// Build the sign-in request for the `social` subcommand.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn social(matches: &ArgMatches) -> Result<SignInRequest> {
    let read = |id: &str| -> Result<String> {
        matches
            .get_one::<String>(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
    };

    Ok(SignInRequest::social(
        read(ARG_PROVIDER)?,
        read(ARG_IDENTITY_TOKEN)?,
    ))
}

#[must_use]
pub fn fetch(matches: &ArgMatches) -> Option<String> {
    matches
        .get_one::<String>(ARG_FETCH)
        .cloned()
        .filter(|v| !v.trim().is_empty())
}

fn fetch_arg() -> Arg {
    Arg::new(ARG_FETCH)
        .long("fetch")
        .help("Backend path to GET with the new session, example: /api/v1/tracks")
        .value_name("PATH")
}

#[must_use]
pub fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in with username and password")
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long("username")
                .help("Account username")
                .env("SOUNDGATE_USERNAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long("password")
                .help("Account password")
                .env("SOUNDGATE_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(fetch_arg())
}

#[must_use]
pub fn social_login() -> Command {
    Command::new(CMD_SOCIAL)
        .about("Sign in with a social provider identity token")
        .arg(
            Arg::new(ARG_PROVIDER)
                .long("provider")
                .help("Social provider: github, google, facebook")
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDENTITY_TOKEN)
                .long("identity-token")
                .help("Identity token issued by the provider")
                .env("SOUNDGATE_IDENTITY_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(fetch_arg())
}
