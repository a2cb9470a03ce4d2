//! Credential infrastructure library
//!
//! Provides the two credential concerns of the onboarding backend:
//! - First-party token issuance (signed JWT access/refresh pairs)
//! - External identity verification (IdP ID-token validation)
//!
//! The service defines its own domain ports and adapts these implementations,
//! keeping domain logic decoupled from the signing and verification machinery.
//!
//! # Examples
//!
//! ## Issuing a token pair
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", "account-service");
//! let pair = issuer.issue_pair("42").unwrap();
//! assert!(pair.expires_at < pair.refresh_token_expires_at);
//! ```
//!
//! ## Parsing a provider tag
//! ```
//! use auth::idp::Provider;
//!
//! let provider: Provider = "google".parse().unwrap();
//! assert_eq!(provider, Provider::Google);
//! ```

pub mod idp;
pub mod token;

// Re-export commonly used items
pub use idp::GoogleIdTokenVerifier;
pub use idp::IdentityVerifier;
pub use idp::IdpVerifier;
pub use idp::Provider;
pub use idp::VerifyError;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenIssuer;
pub use token::TokenPair;
