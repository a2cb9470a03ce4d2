pub mod errors;
pub mod google;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

pub use errors::ProviderParseError;
pub use errors::VerifyError;
pub use google::GoogleIdTokenVerifier;

/// Supported external identity providers.
///
/// A closed set: adding a provider means adding a variant and its verification
/// strategy, checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Facebook,
}

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "facebook" => Ok(Provider::Facebook),
            other => Err(ProviderParseError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Google => write!(f, "google"),
            Provider::Facebook => write!(f, "facebook"),
        }
    }
}

/// Port for external identity verification.
///
/// Validates an opaque IdP token and returns the verified email claim.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Verify an external token against the named provider.
    ///
    /// # Returns
    /// The authenticated email address extracted from the token payload
    ///
    /// # Errors
    /// * `InvalidToken` - expired, bad signature, wrong issuer or audience
    /// * `UnsupportedProvider` - the provider has no verification strategy yet
    /// * `KeyDiscovery` - the provider's public keys could not be fetched
    async fn verify_email(&self, token: &str, provider: Provider) -> Result<String, VerifyError>;
}

/// Dispatching verifier covering every `Provider` variant.
pub struct IdpVerifier {
    google: GoogleIdTokenVerifier,
}

impl IdpVerifier {
    /// Build the verifier set from the configured Google client id (the
    /// audience tokens are checked against).
    ///
    /// # Errors
    /// Returns the underlying HTTP client construction error.
    pub fn new(google_client_id: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            google: GoogleIdTokenVerifier::new(google_client_id)?,
        })
    }
}

#[async_trait]
impl IdentityVerifier for IdpVerifier {
    async fn verify_email(&self, token: &str, provider: Provider) -> Result<String, VerifyError> {
        match provider {
            Provider::Google => self.google.verify(token).await,
            Provider::Facebook => {
                tracing::warn!(provider = %provider, "Verification not implemented");
                Err(VerifyError::UnsupportedProvider(provider))
            }
        }
    }
}
