use auth::TokenError;
use auth::VerifyError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Dni validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DniError {
    #[error("Dni must not be empty")]
    Empty,
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Top-level error for all onboarding operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid dni: {0}")]
    InvalidDni(#[from] DniError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    // Domain-level errors
    #[error("User not registered, please signup")]
    NotRegistered(String),

    #[error("User already registered")]
    AlreadyRegistered(String),

    #[error("A user already exists with email '{0}'")]
    EmailAlreadyExists(String),

    #[error("A user already exists with dni '{0}'")]
    DniAlreadyExists(String),

    #[error("User not found: {0}")]
    NotFound(String),

    // Credential errors
    #[error("Identity verification failed: {0}")]
    IdentityVerification(#[from] VerifyError),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(#[from] TokenError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
