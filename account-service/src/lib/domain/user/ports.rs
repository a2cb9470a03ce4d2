use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Profile;
use crate::domain::user::models::User;
use crate::domain::user::models::UserAccess;
use crate::domain::user::models::UserId;
use auth::Provider;

/// Port for the onboarding flows (login, two-step signup, direct
/// registration, profile lookup).
#[async_trait]
pub trait OnboardingServicePort: Send + Sync + 'static {
    /// Authenticate an existing user from an external IdP token.
    ///
    /// # Arguments
    /// * `idp_token` - Opaque bearer token issued by the external provider
    /// * `provider` - The provider the token claims to come from
    ///
    /// # Returns
    /// The stored user plus a fresh access/refresh token pair
    ///
    /// # Errors
    /// * `IdentityVerification` - the token could not be verified
    /// * `NotRegistered` - no user exists for the verified email
    /// * `TokenIssuance` - signing failed
    /// * `DatabaseError` - store operation failed
    async fn login(&self, idp_token: &str, provider: Provider)
        -> Result<UserAccess, UserError>;

    /// Signup step "1": check that the verified email is still available.
    ///
    /// Never creates a record.
    ///
    /// # Errors
    /// * `IdentityVerification` - the token could not be verified
    /// * `AlreadyRegistered` - a user already exists for the verified email
    /// * `DatabaseError` - store operation failed
    async fn check_availability(
        &self,
        idp_token: &str,
        provider: Provider,
    ) -> Result<(), UserError>;

    /// Signup step "2": create the user from the verified email plus the
    /// supplied profile, then issue a token pair.
    ///
    /// The email always comes from the verified claim, never from the body.
    ///
    /// # Errors
    /// * `IdentityVerification` - the token could not be verified
    /// * `EmailAlreadyExists` / `DniAlreadyExists` - uniqueness conflict
    /// * `TokenIssuance` - signing failed
    /// * `DatabaseError` - store operation failed
    async fn complete_signup(
        &self,
        idp_token: &str,
        provider: Provider,
        profile: Profile,
    ) -> Result<UserAccess, UserError>;

    /// Direct registration without an external IdP.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `DniAlreadyExists` - uniqueness conflict
    /// * `TokenIssuance` - signing failed
    /// * `DatabaseError` - store operation failed
    async fn register(&self, command: CreateUserCommand) -> Result<UserAccess, UserError>;

    /// Fetch a stored profile by email.
    ///
    /// # Errors
    /// * `NotFound` - no user with this email
    /// * `DatabaseError` - store operation failed
    async fn get_profile(&self, email: &EmailAddress) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate.
///
/// Uniqueness of email and dni is enforced atomically by the store at insert
/// time; concurrent creates for the same key see exactly one success and one
/// conflict.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieve a user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Persist a new user, receiving back the store-assigned id and creation
    /// timestamp.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - email is already registered
    /// * `DniAlreadyExists` - dni is already registered
    /// * `DatabaseError` - store operation failed
    async fn create(&self, new_user: NewUser) -> Result<User, UserError>;

    /// Remove a user by id.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `DatabaseError` - store operation failed
    async fn delete(&self, id: UserId) -> Result<(), UserError>;
}
