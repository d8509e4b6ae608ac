use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an access token.
///
/// A closed struct rather than an open map: the authorization flow looks
/// accounts up by these exact fields, so they are named and type-checked.
/// Tokens carry no role or permission data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub email: String,
    pub username: String,
}

impl Claims {
    pub fn new(email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
        }
    }
}

/// Claims carried by a refresh token.
///
/// Restricted to the minimal identity needed to re-derive an account: a
/// refresh token can only drive an account lookup, never mint API claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub email: String,
}

impl RefreshClaims {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize_to_named_fields() {
        let claims = Claims::new("alice@example.com", "alice");
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_refresh_claims_carry_email_only() {
        let claims = RefreshClaims::new("alice@example.com");
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["email"], "alice@example.com");
    }
}
