//! # Soundgate (sign-in and session core)
//!
//! `soundgate` authenticates a listener against the streaming backend and keeps
//! the resulting token pair for authenticated API calls.
//!
//! ## Sign-in paths
//!
//! - **Credentials:** username and password are exchanged at
//!   `POST /api/v1/auth/login`.
//! - **Social:** a provider identity token is verified by the provider (GitHub is
//!   wired), and the verified email is exchanged at `POST /api/v1/auth/social-media`.
//!
//! Both paths end in the same backend-issued token pair. The pair is folded into
//! the canonical session state by a pure reducer ([`auth::merge`]) and read back
//! through [`auth::SessionStore::current_session`], which always hands out a copy.
//!
//! Token material and passwords must never be logged.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
