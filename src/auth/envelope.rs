//! Backend reply envelope `{ data, message, statusCode, error }` and the shared
//! rules for turning a sign-in reply into a token pair.

use crate::auth::{error::AuthError, transport::BackendReply, types::TokenPair};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendResponse<T> {
    pub data: Option<T>,
    pub message: Option<Value>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl<T> BackendResponse<T> {
    /// Backend message as text. Validation failures arrive as a list.
    #[must_use]
    pub fn message_text(&self) -> Option<String> {
        self.message
            .as_ref()
            .and_then(|message| match message {
                Value::String(message) => Some(message.clone()),
                Value::Array(items) => {
                    let joined = items
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join("; ");
                    (!joined.is_empty()).then_some(joined)
                }
                _ => None,
            })
            .or_else(|| self.error.clone())
    }
}

/// Best-effort message from an arbitrary reply body.
pub(crate) fn reply_message(body: &Value) -> Option<String> {
    match body {
        Value::String(text) => Some(text.clone()),
        Value::Object(_) => serde_json::from_value::<BackendResponse<Value>>(body.clone())
            .ok()
            .and_then(|envelope| envelope.message_text()),
        _ => None,
    }
}

/// Interprets a login or social-login reply.
///
/// 5xx and malformed successes mean the backend is unavailable; a 4xx or a
/// missing `data` means the identity was rejected with `rejected` as message.
pub(crate) fn decode_token_pair(reply: BackendReply, rejected: &str) -> Result<TokenPair, AuthError> {
    if reply.is_server_error() {
        return Err(AuthError::UpstreamUnavailable(format!(
            "backend returned status {}",
            reply.status
        )));
    }

    if reply.is_client_error() {
        debug!(
            "sign-in rejected with status {}: {}",
            reply.status,
            reply_message(&reply.body).unwrap_or_default()
        );
        return Err(AuthError::AuthenticationRejected(rejected.to_string()));
    }

    if !reply.is_success() {
        return Err(AuthError::UpstreamUnavailable(format!(
            "unexpected status {}",
            reply.status
        )));
    }

    // an empty 2xx body carries no token pair
    if reply.body.is_null() {
        debug!("sign-in rejected: empty reply with status {}", reply.status);
        return Err(AuthError::AuthenticationRejected(rejected.to_string()));
    }

    let envelope: BackendResponse<Value> = serde_json::from_value(reply.body).map_err(|err| {
        AuthError::UpstreamUnavailable(format!("Failed to decode response: {err}"))
    })?;

    match envelope.data {
        Some(data) => serde_json::from_value(data).map_err(|err| {
            AuthError::UpstreamUnavailable(format!("Failed to decode token pair: {err}"))
        }),
        None => {
            debug!(
                "sign-in rejected: {}",
                envelope.message_text().unwrap_or_default()
            );
            Err(AuthError::AuthenticationRejected(rejected.to_string()))
        }
    }
}
