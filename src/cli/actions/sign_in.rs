use crate::{
    api::ApiClient,
    auth::{
        error::AuthError,
        transport::{HttpTransport, Transport},
        types::SignInRequest,
        verifier::{GithubVerifier, IdentityVerifier},
        Authenticator,
    },
    config::AuthConfig,
};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Args {
    pub config: AuthConfig,
    pub request: SignInRequest,
    pub fetch: Option<String>,
}

/// Execute the sign-in action and print the result as JSON on stdout.
/// # Errors
/// Returns an error if the sign-in or the follow-up fetch fails.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let transport = HttpTransport::new(args.config.request_timeout)
        .context("Failed to build HTTP client")?;
    let verifier = GithubVerifier::new(transport.clone(), &args.config.github_api_url);

    let output = run(args, transport, verifier).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Sign in, then fetch `args.fetch` with the new session when given.
///
/// Returns `{ "session": SessionView }`, plus `"resource"` when a fetch ran.
///
/// # Errors
/// Returns an error if the sign-in or the fetch fails. A fetch refused with an
/// expired authorization signs the session out before returning.
pub async fn run<T, V>(args: Args, transport: T, verifier: V) -> Result<Value>
where
    T: Transport + Clone,
    V: IdentityVerifier,
{
    let authenticator = Authenticator::new(transport.clone(), verifier, &args.config);

    let session = authenticator
        .sign_in(args.request)
        .await
        .context("sign-in failed")?;
    info!("signed in as {}", session.user.username);

    let Some(path) = args.fetch else {
        return Ok(json!({ "session": session }));
    };

    let client = ApiClient::new(transport, &args.config, authenticator.store().clone());

    match client.get_json::<Value>(&path).await {
        Ok(resource) => Ok(json!({ "session": session, "resource": resource })),
        Err(AuthError::AuthorizationExpired) => {
            warn!("authorization expired while fetching {}", path);
            authenticator.sign_out();
            Err(AuthError::AuthorizationExpired)
                .with_context(|| format!("Failed to fetch {path}"))
        }
        Err(err) => Err(err).with_context(|| format!("Failed to fetch {path}")),
    }
}

fn log_startup_args(args: &Args) {
    debug!(
        backend_url = %args.config.backend_url,
        github_api_url = %args.config.github_api_url,
        timeout_seconds = args.config.request_timeout.as_secs(),
        providers = ?args.config.providers.enabled(),
        session_secret_set = args.config.session_secret.is_some(),
        fetch = ?args.fetch,
        "sign-in configuration"
    );
}
