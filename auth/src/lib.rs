//! Authentication utilities library
//!
//! Provides the credential and token primitives for the account service:
//! - Password hashing (Argon2id) with per-account salts
//! - Signed access/refresh tokens whose expiry is checked by the caller,
//!   not the codec
//! - Time-boxed verification tokens for account activation links
//!
//! The service defines its own domain traits and adapts these
//! implementations; nothing in here performs I/O.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let salt = PasswordHasher::generate_salt();
//! let secret = format!("{}{}", salt.as_str(), "my_password");
//! let hash = hasher.hash(&secret).unwrap();
//! assert!(hasher.verify(&secret, &hash).unwrap());
//! ```
//!
//! ## Access and Refresh Tokens
//! ```
//! use auth::{Claims, TokenIssuer};
//! use chrono::{Duration, Utc};
//!
//! let issuer = TokenIssuer::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::seconds(600),
//!     Duration::seconds(86_400),
//! );
//! let claims = Claims::new("alice@example.com", "alice");
//! let token = issuer.issue_access(&claims).unwrap();
//!
//! let envelope = issuer.decode_access(&token).unwrap();
//! assert_eq!(envelope.claims, claims);
//! assert!(!envelope.is_expired(Utc::now()));
//! ```
//!
//! ## Verification Tokens
//! ```
//! use auth::TimedTokenSerializer;
//! use chrono::Duration;
//!
//! let serializer = TimedTokenSerializer::new(b"verification_secret");
//! let token = serializer.encode("account-id");
//! let payload = serializer.decode(&token, Duration::seconds(60)).unwrap();
//! assert_eq!(payload.subject, "account-id");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::Envelope;
pub use token::RefreshClaims;
pub use token::SignedTokenCodec;
pub use token::TimedPayload;
pub use token::TimedTokenError;
pub use token::TimedTokenSerializer;
pub use token::TokenError;
pub use token::TokenIssuer;
