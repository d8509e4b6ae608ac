use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;

use super::errors::TimedTokenError;

type HmacSha256 = Hmac<Sha256>;

/// Decoded verification-token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedPayload {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
}

/// Serializer for single-purpose, time-boxed tokens.
///
/// Tokens embed their creation timestamp, so the maximum age is supplied at
/// decode time rather than carried in the token. Layout is
/// `b64(subject).b64(unix-seconds).b64(mac)` with an HMAC-SHA256 signature
/// over the first two parts.
pub struct TimedTokenSerializer {
    secret: Vec<u8>,
}

impl TimedTokenSerializer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    /// Encode a subject into a signed, timestamped token.
    pub fn encode(&self, subject: &str) -> String {
        self.encode_at(subject, Utc::now())
    }

    fn encode_at(&self, subject: &str, issued_at: DateTime<Utc>) -> String {
        let subject_b64 = URL_SAFE_NO_PAD.encode(subject.as_bytes());
        let timestamp_b64 = URL_SAFE_NO_PAD.encode(issued_at.timestamp().to_string().as_bytes());
        let signed_part = format!("{}.{}", subject_b64, timestamp_b64);

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(signed_part.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signed_part, signature)
    }

    /// Decode a token, enforcing the given maximum age.
    ///
    /// The signature is checked (in constant time) before any field is
    /// trusted. A token older than `max_age` fails with `Expired` carrying
    /// its original creation timestamp; a valid, unexpired token yields the
    /// subject with no expiry flag.
    ///
    /// # Errors
    /// * `Invalid` - Malformed token or signature mismatch
    /// * `Expired` - Authentic token older than `max_age`
    pub fn decode(&self, token: &str, max_age: Duration) -> Result<TimedPayload, TimedTokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(TimedTokenError::Invalid);
        }

        let signed_part = format!("{}.{}", parts[0], parts[1]);
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(signed_part.as_bytes());

        let signature = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| TimedTokenError::Invalid)?;
        mac.verify_slice(&signature)
            .map_err(|_| TimedTokenError::Invalid)?;

        let subject = URL_SAFE_NO_PAD
            .decode(parts[0])
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or(TimedTokenError::Invalid)?;

        let issued_at = URL_SAFE_NO_PAD
            .decode(parts[1])
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(TimedTokenError::Invalid)?;

        let elapsed = Utc::now() - issued_at;
        if elapsed > max_age {
            return Err(TimedTokenError::Expired { issued_at });
        }

        Ok(TimedPayload { subject, issued_at })
    }
}
