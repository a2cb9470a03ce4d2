use thiserror::Error;

use super::Provider;

/// Error for provider tag parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderParseError {
    #[error("Unknown identity provider: {0}")]
    Unknown(String),
}

/// Error type for external identity verification.
///
/// Every variant is terminal for the current request; callers must never fall
/// back to a default identity.
#[derive(Debug, Clone, Error)]
pub enum VerifyError {
    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    #[error("Identity provider '{0}' is not supported yet")]
    UnsupportedProvider(Provider),

    #[error("Failed to fetch identity provider keys: {0}")]
    KeyDiscovery(String),
}
