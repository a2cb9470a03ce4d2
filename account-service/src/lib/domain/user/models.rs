use std::fmt;
use std::str::FromStr;

use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::DniError;
use crate::user::errors::EmailError;
use crate::user::errors::RoleError;

/// User aggregate entity.
///
/// Represents a registered user. The id and creation timestamp are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub role: Role,
    pub dni: Dni,
    pub name: String,
    pub lastname_main: String,
    pub lastname_secondary: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role assigned to a user record.
///
/// Self-registered users always get `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Email address type
///
/// Lowercase-normalized and validated with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, lowercase-normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailError> {
        let email = email.as_ref().trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// National identity document number.
///
/// Globally unique per user; the store enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dni(String);

impl Dni {
    /// # Errors
    /// * `Empty` - the value is empty or whitespace-only
    pub fn new(dni: impl Into<String>) -> Result<Self, DniError> {
        let dni = dni.into();
        if dni.trim().is_empty() {
            return Err(DniError::Empty);
        }
        Ok(Self(dni))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dni {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Profile fields supplied by the user at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub dni: Dni,
    pub name: String,
    pub lastname_main: String,
    pub lastname_secondary: String,
    pub address: String,
}

/// Unsaved user record handed to the store; id and created_at come back from
/// the insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub role: Role,
    pub profile: Profile,
}

/// Command for direct registration (no IdP involved).
#[derive(Debug)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub profile: Profile,
}

/// Result of a successful access-granting flow: the stored profile plus a
/// freshly minted token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccess {
    pub user: User,
    pub tokens: TokenPair,
}
