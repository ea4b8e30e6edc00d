use thiserror::Error;

/// User-facing message for a rejected credential exchange.
pub const INVALID_CREDENTIALS: &str = "invalid username or password";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    AuthenticationRejected(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("authorization expired")]
    AuthorizationExpired,
    #[error("request failed ({status}): {message}")]
    Backend { status: u16, message: String },
}

impl AuthError {
    /// True when the caller may reasonably offer "try again".
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("Unable to reach the server: {0}")]
    Network(String),
    #[error("Request error: {0}")]
    Request(String),
}

impl From<TransportError> for AuthError {
    fn from(err: TransportError) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}
