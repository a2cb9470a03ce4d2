use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Serialize;

use super::claims::Claims;
use super::errors::TokenError;

/// Access token lifetime. Fixed policy, not configurable.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 10;

/// Refresh token lifetime. Fixed policy, not configurable.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Access/refresh credential pair minted on every successful login or
/// registration. Never persisted server-side.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Issues signed, time-bounded first-party tokens.
///
/// Holds the process-wide symmetric signing secret, injected at construction
/// time so environments and tests can supply their own keys. Uses HS256.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
}

impl TokenIssuer {
    /// Create a new issuer from the signing secret and the fixed issuer label.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
        }
    }

    /// Mint a short-lived access token for a subject.
    ///
    /// # Returns
    /// The signed token and its absolute expiry (`now` + 10 minutes)
    ///
    /// # Errors
    /// * `SigningFailed` - the token could not be signed; the caller must treat
    ///   this as fatal for the request, never fall back to an unsigned token
    pub fn issue_access_token(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let expires_at = now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES);
        let token = self.sign(subject, now, expires_at)?;
        Ok((token, expires_at))
    }

    /// Mint a long-lived refresh token for a subject.
    ///
    /// # Returns
    /// The signed token and its absolute expiry (`now` + 7 days)
    ///
    /// # Errors
    /// * `SigningFailed` - the token could not be signed
    pub fn issue_refresh_token(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let expires_at = now + Duration::days(REFRESH_TOKEN_TTL_DAYS);
        let token = self.sign(subject, now, expires_at)?;
        Ok((token, expires_at))
    }

    /// Mint an access/refresh pair for a subject at the current instant.
    ///
    /// Both tokens are issued independently; neither can be derived from the
    /// other.
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        let (access_token, expires_at) = self.issue_access_token(subject, now)?;
        let (refresh_token, refresh_token_expires_at) = self.issue_refresh_token(subject, now)?;

        Ok(TokenPair {
            access_token,
            expires_at,
            refresh_token,
            refresh_token_expires_at,
        })
    }

    /// Decode and validate a previously issued token.
    ///
    /// Checks signature, expiry, and issuer.
    ///
    /// # Errors
    /// * `TokenExpired` - the token's `exp` is in the past
    /// * `DecodingFailed` - bad signature, wrong issuer, or malformed token
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::DecodingFailed(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    fn sign(
        &self,
        subject: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject, &self.issuer, now, expires_at);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes_long!";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, "account-service")
    }

    #[test]
    fn test_access_token_expiry_policy() {
        let now = Utc::now();
        let (token, expires_at) = issuer().issue_access_token("42", now).unwrap();

        assert!(!token.is_empty());
        assert_eq!(expires_at, now + Duration::minutes(10));
    }

    #[test]
    fn test_refresh_token_expiry_policy() {
        let now = Utc::now();
        let (token, expires_at) = issuer().issue_refresh_token("42", now).unwrap();

        assert!(!token.is_empty());
        assert_eq!(expires_at, now + Duration::days(7));
    }

    #[test]
    fn test_pair_access_expires_before_refresh() {
        let pair = issuer().issue_pair("42").unwrap();

        assert!(pair.expires_at < pair.refresh_token_expires_at);
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_distinct_instants_produce_distinct_tokens() {
        let issuer = issuer();
        let now = Utc::now();

        let (first, _) = issuer.issue_access_token("42", now).unwrap();
        let (second, _) = issuer
            .issue_access_token("42", now + Duration::seconds(1))
            .unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_decode_round_trip() {
        let issuer = issuer();
        let now = Utc::now();
        let (token, _) = issuer.issue_access_token("42", now).unwrap();

        let claims = issuer.decode(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "account-service");
        assert_eq!(claims.exp - claims.iat, 10 * 60);
    }

    #[test]
    fn test_decode_with_wrong_secret_fails() {
        let now = Utc::now();
        let (token, _) = issuer().issue_access_token("42", now).unwrap();

        let other = TokenIssuer::new(b"another_secret_at_least_32_bytes!!!", "account-service");
        assert!(matches!(
            other.decode(&token),
            Err(TokenError::DecodingFailed(_))
        ));
    }

    #[test]
    fn test_decode_with_wrong_issuer_fails() {
        let now = Utc::now();
        let (token, _) = issuer().issue_access_token("42", now).unwrap();

        let other = TokenIssuer::new(SECRET, "some-other-service");
        assert!(matches!(
            other.decode(&token),
            Err(TokenError::DecodingFailed(_))
        ));
    }

    #[test]
    fn test_decode_expired_token() {
        let issuer = issuer();
        let past = Utc::now() - Duration::days(30);
        let (token, _) = issuer.issue_access_token("42", past).unwrap();

        assert!(matches!(issuer.decode(&token), Err(TokenError::TokenExpired)));
    }
}
