//! Canonical session state shared by every unit of work in one session.
//!
//! Writes go through [`SessionStore::apply`], which runs [`merge`] under the
//! write lock and swaps the whole state, so readers never see a half-updated
//! pair. Reads return a detached [`SessionView`]. The lock is never held across
//! an `.await`.

use crate::auth::{
    merge::{merge, SessionEvent, SessionState},
    types::SessionView,
};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits one event and returns the resulting view.
    pub fn apply(&self, event: SessionEvent) -> Option<SessionView> {
        let label = event_label(&event);
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let was_authenticated = guard.is_authenticated();
        let prior = std::mem::take(&mut *guard);
        *guard = merge(event, prior);

        if was_authenticated == guard.is_authenticated() {
            debug!("session event {} applied", label);
        } else {
            info!(
                "session event {} moved session to {}",
                label,
                if guard.is_authenticated() {
                    "authenticated"
                } else {
                    "unauthenticated"
                }
            );
        }

        guard.view()
    }

    /// The current session, or `None` when nobody is signed in.
    #[must_use]
    pub fn current_session(&self) -> Option<SessionView> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .view()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    /// Copy of the canonical state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

const fn event_label(event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::CredentialSignInSucceeded(_) => "credential_sign_in_succeeded",
        SessionEvent::SocialSignInSucceeded { .. } => "social_sign_in_succeeded",
        SessionEvent::SignInFailed => "sign_in_failed",
        SessionEvent::UpstreamUnavailable => "upstream_unavailable",
        SessionEvent::SignedOut => "signed_out",
    }
}
