//! One sign-in attempt end to end: validate, exchange, turn the outcome into a
//! [`SessionEvent`] and commit it. Nothing is committed until the exchange has
//! fully resolved, so dropping the future mid-flight leaves the session as it
//! was. Errors are returned to the caller unchanged.

use crate::{
    auth::{
        credentials::CredentialExchanger,
        error::AuthError,
        merge::SessionEvent,
        session::SessionStore,
        social::SocialIdentityBridge,
        transport::Transport,
        types::{Credentials, Provider, SessionView, SignInMethod, SignInRequest},
        verifier::IdentityVerifier,
    },
    config::AuthConfig,
};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub struct Authenticator<T, V> {
    credentials: CredentialExchanger<T>,
    social: SocialIdentityBridge<T>,
    verifier: V,
    store: SessionStore,
}

impl<T, V> Authenticator<T, V>
where
    T: Transport + Clone,
    V: IdentityVerifier,
{
    pub fn new(transport: T, verifier: V, config: &AuthConfig) -> Self {
        let backend_url = config.backend_url.as_str();

        Self {
            credentials: CredentialExchanger::new(transport.clone(), backend_url),
            social: SocialIdentityBridge::new(transport, backend_url, config.providers.enabled()),
            verifier,
            store: SessionStore::new(),
        }
    }

    /// Use an existing store, e.g. one shared with an [`crate::api::ApiClient`].
    #[must_use]
    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = store;
        self
    }

    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Runs one sign-in attempt and returns the resulting session.
    ///
    /// # Errors
    /// Returns the exchange or verification error untransformed. A failed
    /// attempt never signs out an existing session.
    pub async fn sign_in(&self, request: SignInRequest) -> Result<SessionView, AuthError> {
        match request {
            SignInRequest::Credentials(credentials) => {
                self.sign_in_with_credentials(&credentials).await
            }
            SignInRequest::Social {
                provider,
                identity_token,
            } => self.sign_in_with_provider(&provider, &identity_token).await,
        }
    }

    #[instrument(skip_all, fields(method = "credentials"))]
    async fn sign_in_with_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionView, AuthError> {
        let outcome = self.credentials.exchange(credentials).await;
        self.commit(SessionEvent::from_credential_outcome(&outcome));

        match &outcome {
            Ok(_) => info!("credential sign-in succeeded"),
            Err(err) => warn!("credential sign-in failed: {}", err),
        }

        outcome.map(SessionView::from)
    }

    #[instrument(skip_all, fields(method = "social", provider = %provider))]
    async fn sign_in_with_provider(
        &self,
        provider: &str,
        identity_token: &SecretString,
    ) -> Result<SessionView, AuthError> {
        let provider: Provider = provider.parse()?;
        if !self.social.is_enabled(provider) {
            return Err(AuthError::InvalidInput(format!(
                "provider {provider} is not enabled"
            )));
        }

        let outcome = match self.verifier.verify(provider, identity_token).await {
            Ok(claim) => self.social.exchange(&claim).await,
            Err(err) => Err(err),
        };
        self.commit(SessionEvent::from_social_outcome(
            SignInMethod::Social(provider),
            &outcome,
        ));

        match &outcome {
            Ok(_) => info!("social sign-in succeeded"),
            Err(err) => warn!("social sign-in failed: {}", err),
        }

        outcome.map(SessionView::from)
    }

    /// Ends the session; also the response to an expired authorization.
    pub fn sign_out(&self) {
        self.store.apply(SessionEvent::SignedOut);
    }

    #[must_use]
    pub fn current_session(&self) -> Option<SessionView> {
        self.store.current_session()
    }

    fn commit(&self, event: Option<SessionEvent>) {
        if let Some(event) = event {
            self.store.apply(event);
        }
    }
}
