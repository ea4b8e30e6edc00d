//! Session state machine. [`merge`] is the only function that computes a new
//! canonical state; it performs no I/O and never fails, so every transition can
//! be tested without a network.

use crate::auth::{
    error::AuthError,
    types::{SessionView, SignInMethod, TokenPair},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(TokenPair),
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Detached projection of the state; `None` when signed out.
    #[must_use]
    pub fn view(&self) -> Option<SessionView> {
        match self {
            Self::Unauthenticated => None,
            Self::Authenticated(pair) => Some(SessionView::from(pair)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    CredentialSignInSucceeded(TokenPair),
    SocialSignInSucceeded {
        method: SignInMethod,
        pair: TokenPair,
    },
    SignInFailed,
    UpstreamUnavailable,
    SignedOut,
}

impl SessionEvent {
    /// Event for a credential exchange outcome. Input errors never reached the
    /// backend and produce no event.
    #[must_use]
    pub fn from_credential_outcome(outcome: &Result<TokenPair, AuthError>) -> Option<Self> {
        match outcome {
            Ok(pair) => Some(Self::CredentialSignInSucceeded(pair.clone())),
            Err(err) => Self::from_failure(err),
        }
    }

    /// Event for a social exchange outcome.
    #[must_use]
    pub fn from_social_outcome(
        method: SignInMethod,
        outcome: &Result<TokenPair, AuthError>,
    ) -> Option<Self> {
        match outcome {
            Ok(pair) => Some(Self::SocialSignInSucceeded {
                method,
                pair: pair.clone(),
            }),
            Err(err) => Self::from_failure(err),
        }
    }

    /// Single event when both paths report for the same transition. A credential
    /// success beats a social success, and any success beats a failure.
    #[must_use]
    pub fn from_outcomes(
        credential: Option<&Result<TokenPair, AuthError>>,
        social: Option<(SignInMethod, &Result<TokenPair, AuthError>)>,
    ) -> Option<Self> {
        if let Some(Ok(pair)) = credential {
            return Some(Self::CredentialSignInSucceeded(pair.clone()));
        }

        if let Some((method, Ok(pair))) = social {
            return Some(Self::SocialSignInSucceeded {
                method,
                pair: pair.clone(),
            });
        }

        credential
            .and_then(Self::from_credential_outcome)
            .or_else(|| social.and_then(|(method, outcome)| Self::from_social_outcome(method, outcome)))
    }

    fn from_failure(err: &AuthError) -> Option<Self> {
        match err {
            AuthError::InvalidInput(_) => None,
            AuthError::UpstreamUnavailable(_) => Some(Self::UpstreamUnavailable),
            AuthError::AuthenticationRejected(_)
            | AuthError::AuthorizationExpired
            | AuthError::Backend { .. } => Some(Self::SignInFailed),
        }
    }
}

/// Computes the next canonical state. The pair is always replaced whole.
#[must_use]
pub fn merge(event: SessionEvent, prior: SessionState) -> SessionState {
    match event {
        SessionEvent::CredentialSignInSucceeded(pair) => SessionState::Authenticated(pair),
        // A credential-originated refresh must not re-run the social path.
        SessionEvent::SocialSignInSucceeded { method, pair } => match method {
            SignInMethod::Credentials => prior,
            SignInMethod::Social(_) => SessionState::Authenticated(pair),
        },
        SessionEvent::SignInFailed | SessionEvent::UpstreamUnavailable => prior,
        SessionEvent::SignedOut => SessionState::Unauthenticated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{Provider, UserProfile};

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            user: UserProfile {
                id: format!("user-{access}"),
                ..UserProfile::default()
            },
        }
    }

    fn priors() -> Vec<SessionState> {
        vec![
            SessionState::Unauthenticated,
            SessionState::Authenticated(pair("A0", "R0")),
            SessionState::Authenticated(pair("A9", "R9")),
        ]
    }

    #[test]
    fn initial_state_is_unauthenticated() {
        assert_eq!(SessionState::default(), SessionState::Unauthenticated);
        assert!(SessionState::default().view().is_none());
    }

    #[test]
    fn failures_never_mutate_state() {
        for prior in priors() {
            for event in [SessionEvent::SignInFailed, SessionEvent::UpstreamUnavailable] {
                assert_eq!(merge(event, prior.clone()), prior);
            }
        }
    }

    #[test]
    fn credential_success_always_wins() {
        let fresh = pair("A1", "R1");
        for prior in priors() {
            let next = merge(SessionEvent::CredentialSignInSucceeded(fresh.clone()), prior);
            assert_eq!(next, SessionState::Authenticated(fresh.clone()));
        }
    }

    #[test]
    fn signed_out_clears_any_state() {
        for prior in priors() {
            assert_eq!(
                merge(SessionEvent::SignedOut, prior),
                SessionState::Unauthenticated
            );
        }
    }

    #[test]
    fn social_success_authenticates_for_social_origin() {
        let fresh = pair("A2", "R2");
        for prior in priors() {
            let next = merge(
                SessionEvent::SocialSignInSucceeded {
                    method: SignInMethod::Social(Provider::Github),
                    pair: fresh.clone(),
                },
                prior,
            );
            assert_eq!(next, SessionState::Authenticated(fresh.clone()));
        }
    }

    #[test]
    fn social_success_is_ignored_for_credential_origin() {
        for prior in priors() {
            let next = merge(
                SessionEvent::SocialSignInSucceeded {
                    method: SignInMethod::Credentials,
                    pair: pair("A3", "R3"),
                },
                prior.clone(),
            );
            assert_eq!(next, prior);
        }
    }

    #[test]
    fn outcome_mapping() {
        assert_eq!(
            SessionEvent::from_credential_outcome(&Err(AuthError::InvalidInput(
                "username is required".to_string()
            ))),
            None
        );
        assert_eq!(
            SessionEvent::from_credential_outcome(&Err(AuthError::AuthenticationRejected(
                "nope".to_string()
            ))),
            Some(SessionEvent::SignInFailed)
        );
        assert_eq!(
            SessionEvent::from_social_outcome(
                SignInMethod::Social(Provider::Github),
                &Err(AuthError::UpstreamUnavailable("down".to_string()))
            ),
            Some(SessionEvent::UpstreamUnavailable)
        );
    }

    #[test]
    fn credential_outcome_takes_precedence() {
        let credential = Ok(pair("C1", "CR1"));
        let social = Ok(pair("S1", "SR1"));
        let method = SignInMethod::Social(Provider::Github);

        let event = SessionEvent::from_outcomes(Some(&credential), Some((method, &social)));
        assert_eq!(
            event,
            Some(SessionEvent::CredentialSignInSucceeded(pair("C1", "CR1")))
        );
    }

    #[test]
    fn any_success_beats_a_failure() {
        let credential = Err(AuthError::AuthenticationRejected("nope".to_string()));
        let social = Ok(pair("S1", "SR1"));
        let method = SignInMethod::Social(Provider::Github);

        let event = SessionEvent::from_outcomes(Some(&credential), Some((method, &social)));
        assert_eq!(
            event,
            Some(SessionEvent::SocialSignInSucceeded {
                method,
                pair: pair("S1", "SR1"),
            })
        );

        let social = Err(AuthError::UpstreamUnavailable("down".to_string()));
        let event = SessionEvent::from_outcomes(Some(&credential), Some((method, &social)));
        assert_eq!(event, Some(SessionEvent::SignInFailed));
        assert_eq!(SessionEvent::from_outcomes(None, None), None);
    }
}
