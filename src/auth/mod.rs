//! Sign-in and session core. Both sign-in paths (credentials and social) end in
//! a backend-issued token pair that is folded into one canonical session state.
//! This module touches security boundaries and must avoid logging passwords,
//! identity tokens, or token material.
//!
//! Flow Overview: a [`SignInRequest`] enters the [`Authenticator`], which runs
//! either the [`CredentialExchanger`] or the [`IdentityVerifier`] followed by the
//! [`SocialIdentityBridge`]. The outcome becomes a [`SessionEvent`], the pure
//! [`merge`] reducer computes the next [`SessionState`], and the
//! [`SessionStore`] swaps it in whole. Readers call
//! [`SessionStore::current_session`] and receive a detached [`SessionView`].

pub mod authenticator;
pub mod credentials;
pub(crate) mod envelope;
pub mod error;
pub mod merge;
pub mod session;
pub mod social;
pub mod transport;
pub mod types;
pub mod verifier;

pub use authenticator::Authenticator;
pub use credentials::CredentialExchanger;
pub use envelope::BackendResponse;
pub use error::{AuthError, TransportError};
pub use merge::{merge, SessionEvent, SessionState};
pub use session::SessionStore;
pub use social::SocialIdentityBridge;
pub use transport::{BackendReply, BackendRequest, HttpTransport, Transport};
pub use types::{
    Credentials, IdentityClaim, Provider, SessionView, SignInMethod, SignInRequest, TokenPair,
    UserProfile,
};
pub use verifier::{GithubVerifier, IdentityVerifier};

/// Backend path for the username/password exchange.
pub const LOGIN_PATH: &str = "/api/v1/auth/login";
/// Backend path for the social identity exchange.
pub const SOCIAL_LOGIN_PATH: &str = "/api/v1/auth/social-media";
