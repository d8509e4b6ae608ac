use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

/// Error type for signed-token encode/decode operations.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid: {0}")]
    Invalid(String),
}

/// Error type for the time-boxed verification-token serializer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimedTokenError {
    #[error("Token expired (issued at {issued_at})")]
    Expired { issued_at: DateTime<Utc> },

    #[error("Token is invalid")]
    Invalid,
}
