use std::time::Duration;

use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::errors::VerifyError;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

/// Upper bound on the outbound key-discovery call.
const KEY_FETCH_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Deserialize)]
struct GoogleIdClaims {
    email: String,
}

/// Verifies Google ID tokens against Google's published signing keys.
///
/// Checks expiry, signature, issuer, and the intended audience (the configured
/// OAuth client id), then extracts the verified email claim.
pub struct GoogleIdTokenVerifier {
    http: reqwest::Client,
    client_id: String,
}

impl GoogleIdTokenVerifier {
    /// # Errors
    /// Returns the underlying HTTP client construction error.
    pub fn new(client_id: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(KEY_FETCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            client_id: client_id.into(),
        })
    }

    /// Validate an ID token and return its verified email claim.
    ///
    /// # Errors
    /// * `InvalidToken` - malformed token, unknown key id, bad signature,
    ///   expired, or wrong issuer/audience
    /// * `KeyDiscovery` - Google's JWKS endpoint could not be reached
    pub async fn verify(&self, token: &str) -> Result<String, VerifyError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed ID token");
            VerifyError::InvalidToken(e.to_string())
        })?;
        let kid = header
            .kid
            .ok_or_else(|| VerifyError::InvalidToken("token header missing key id".to_string()))?;

        let keys = self.fetch_keys().await?;
        let jwk = keys.find(&kid).ok_or_else(|| {
            VerifyError::InvalidToken(format!("no Google signing key matches kid '{kid}'"))
        })?;
        let decoding_key =
            DecodingKey::from_jwk(jwk).map_err(|e| VerifyError::InvalidToken(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let token_data =
            decode::<GoogleIdClaims>(token, &decoding_key, &validation).map_err(|e| {
                tracing::warn!(error = %e, "Google ID token failed validation");
                VerifyError::InvalidToken(e.to_string())
            })?;

        Ok(token_data.claims.email)
    }

    async fn fetch_keys(&self) -> Result<JwkSet, VerifyError> {
        self.http
            .get(GOOGLE_JWKS_URL)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| VerifyError::KeyDiscovery(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| VerifyError::KeyDiscovery(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // {"alg":"RS256","typ":"JWT"} without a kid
    const HEADER_NO_KID: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";

    #[tokio::test]
    async fn test_rejects_garbage_token_before_key_fetch() {
        let verifier = GoogleIdTokenVerifier::new("client-id").unwrap();

        let result = verifier.verify("not.a.token").await;
        assert!(matches!(result, Err(VerifyError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_rejects_token_without_key_id() {
        let verifier = GoogleIdTokenVerifier::new("client-id").unwrap();
        let token = format!("{HEADER_NO_KID}.e30.c2ln");

        let result = verifier.verify(&token).await;
        assert!(matches!(
            result,
            Err(VerifyError::InvalidToken(ref msg)) if msg.contains("key id")
        ));
    }
}
