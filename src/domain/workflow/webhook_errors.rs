//! Errors raised while verifying workflow callbacks.

use thiserror::Error;

/// Workflow webhook verification errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// The signature header or payload could not be parsed.
    #[error("webhook parse error: {0}")]
    ParseError(String),

    /// Signature verification failed.
    #[error("webhook signature invalid")]
    InvalidSignature,

    /// The event is older than the acceptance window (replay protection).
    #[error("webhook timestamp too old: {age_secs}s")]
    TimestampOutOfRange { age_secs: i64 },

    /// The event timestamp lies in the future beyond allowed clock skew.
    #[error("webhook timestamp in the future")]
    InvalidTimestamp,
}

impl WebhookError {
    /// Creates a parse error with a message.
    pub fn parse(message: impl Into<String>) -> Self {
        WebhookError::ParseError(message.into())
    }
}
