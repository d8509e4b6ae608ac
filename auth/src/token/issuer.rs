use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::claims::RefreshClaims;
use super::codec::Envelope;
use super::codec::SignedTokenCodec;
use super::errors::TokenError;

/// Issues access and refresh tokens with their configured lifetimes.
///
/// Expiry is computed from the issuer's own clock at issuance time; the
/// decoder never accepts a client-supplied override because the expiry is
/// part of the signed envelope.
pub struct TokenIssuer {
    codec: SignedTokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new issuer over the given signing secret and TTLs.
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            codec: SignedTokenCodec::new(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a short-lived access token for the given identity claims.
    pub fn issue_access(&self, claims: &Claims) -> Result<String, TokenError> {
        self.codec.encode(claims, Utc::now() + self.access_ttl)
    }

    /// Issue a long-lived refresh token.
    ///
    /// Refresh claims carry the account email only.
    pub fn issue_refresh(&self, claims: &RefreshClaims) -> Result<String, TokenError> {
        self.codec.encode(claims, Utc::now() + self.refresh_ttl)
    }

    /// Decode an access token without enforcing expiry.
    pub fn decode_access(&self, token: &str) -> Result<Envelope<Claims>, TokenError> {
        self.codec.decode(token)
    }

    /// Decode a refresh token without enforcing expiry.
    pub fn decode_refresh(&self, token: &str) -> Result<Envelope<RefreshClaims>, TokenError> {
        self.codec.decode(token)
    }
}
