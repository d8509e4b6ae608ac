use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Signed envelope wrapping a claims payload together with its expiry.
///
/// The expiry rides inside the signed payload as a formatted absolute
/// timestamp, next to (not inside) the claims struct. The codec never
/// enforces it: callers compare against their own clock so they can tell
/// "expired, try refresh" apart from "corrupt, reject outright".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<C> {
    #[serde(flatten)]
    pub claims: C,
    pub expires_at: DateTime<Utc>,
}

impl<C> Envelope<C> {
    /// Whether the envelope's expiry has passed.
    ///
    /// The comparison is inclusive: a token expiring at exactly `now` is
    /// already expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Tamper-evident token codec for access and refresh tokens.
///
/// Signs with HS256. Expiry validation is disabled at this layer; see
/// [`Envelope::is_expired`].
pub struct SignedTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl SignedTokenCodec {
    /// Create a new codec from a signing secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode a claims payload into a signed token expiring at `expires_at`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<C: Serialize>(
        &self,
        claims: &C,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);
        let envelope = Envelope {
            claims,
            expires_at,
        };

        encode(&header, &envelope, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode a token, verifying its signature only.
    ///
    /// An expired but authentic token decodes successfully; the caller
    /// inspects the envelope's expiry. Any signature or format failure is
    /// `Invalid` -- there is no "successful but wrong claims" outcome.
    ///
    /// # Errors
    /// * `Invalid` - Signature does not verify or the token is malformed
    pub fn decode<C: DeserializeOwned>(&self, token: &str) -> Result<Envelope<C>, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry lives in the envelope, not in a registered claim; the
        // caller owns the comparison against its clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Envelope<C>>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::token::claims::Claims;

    fn codec() -> SignedTokenCodec {
        SignedTokenCodec::new(b"my_secret_key_at_least_32_bytes_long!")
    }

    #[test]
    fn test_encode_and_decode() {
        let claims = Claims::new("alice@example.com", "alice");
        let expires_at = Utc::now() + Duration::seconds(600);

        let token = codec().encode(&claims, expires_at).expect("Failed to encode");
        let envelope: Envelope<Claims> = codec().decode(&token).expect("Failed to decode");

        assert_eq!(envelope.claims, claims);
        assert!(!envelope.is_expired(Utc::now()));
    }

    #[test]
    fn test_expired_token_still_decodes() {
        let claims = Claims::new("alice@example.com", "alice");
        let expires_at = Utc::now() - Duration::seconds(30);

        let token = codec().encode(&claims, expires_at).unwrap();
        let envelope: Envelope<Claims> = codec().decode(&token).expect("Failed to decode");

        assert_eq!(envelope.claims, claims);
        assert!(envelope.is_expired(Utc::now()));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let claims = Claims::new("alice@example.com", "alice");
        let expires_at = Utc::now();

        let token = codec().encode(&claims, expires_at).unwrap();
        let envelope: Envelope<Claims> = codec().decode(&token).unwrap();

        assert!(envelope.is_expired(envelope.expires_at));
        assert!(!envelope.is_expired(envelope.expires_at - Duration::seconds(1)));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let claims = Claims::new("alice@example.com", "alice");
        let token = codec()
            .encode(&claims, Utc::now() + Duration::seconds(600))
            .unwrap();

        // Flip one character in every position; decode must never yield claims
        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let Ok(tampered) = String::from_utf8(bytes) else {
                continue;
            };
            if tampered == token {
                continue;
            }
            assert!(
                codec().decode::<Claims>(&tampered).is_err(),
                "tampered byte {} decoded successfully",
                i
            );
        }
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let other = SignedTokenCodec::new(b"secret2_at_least_32_bytes_long_key!");
        let claims = Claims::new("alice@example.com", "alice");

        let token = codec()
            .encode(&claims, Utc::now() + Duration::seconds(600))
            .unwrap();

        assert!(matches!(
            other.decode::<Claims>(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(codec().decode::<Claims>("not.a.token").is_err());
        assert!(codec().decode::<Claims>("").is_err());
    }
}
