use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for verification email dispatch
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Failed to build verification email: {0}")]
    BuildFailed(String),

    #[error("Failed to send verification email: {0}")]
    SendFailed(String),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Credential and token failures. The message is fixed and
    // non-revealing; in particular it never carries expiry timestamps.
    #[error("{0}")]
    Unauthorized(&'static str),

    // Identity conflicts with a verified account
    #[error("Username is already taken: {0}")]
    UsernameTaken(String),

    #[error("An account with this email already exists: {0}")]
    EmailTaken(String),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::TokenError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Email transport error: {0}")]
    Transport(#[from] MailerError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
