use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Registered claims carried by every first-party token.
///
/// Access and refresh tokens share this payload; they differ only in their
/// expiration policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the user's persistent identifier, stringified)
    pub sub: String,

    /// Issuer (fixed label identifying this system)
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for a subject with explicit issuance and expiry instants.
    pub fn new(
        subject: impl ToString,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            iss: issuer.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Check if the token is expired at the given instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_new_claims() {
        let now = Utc::now();
        let claims = Claims::new("42", "account-service", now, now + Duration::minutes(10));

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "account-service");
        assert_eq!(claims.exp - claims.iat, 10 * 60);
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        let claims = Claims::new("42", "account-service", now, now);
        let exp = claims.exp;

        assert!(!claims.is_expired(exp - 1));
        assert!(!claims.is_expired(exp));
        assert!(claims.is_expired(exp + 1));
    }
}
