use std::sync::Arc;

use async_trait::async_trait;
use auth::IdentityVerifier;
use auth::Provider;
use auth::TokenIssuer;
use auth::VerifyError;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Profile;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserAccess;
use crate::domain::user::ports::OnboardingServicePort;
use crate::domain::user::ports::UserStore;

/// Domain service implementation for the onboarding flows.
///
/// Orchestrates identity verification, the user store, and token issuance.
/// Transition order within a request is fixed: verify identity before any
/// store access, issue tokens only after the store commit point.
pub struct OnboardingService<S, V>
where
    S: UserStore,
    V: IdentityVerifier,
{
    store: Arc<S>,
    verifier: Arc<V>,
    token_issuer: Arc<TokenIssuer>,
}

impl<S, V> OnboardingService<S, V>
where
    S: UserStore,
    V: IdentityVerifier,
{
    /// Create a new onboarding service with injected dependencies.
    pub fn new(store: Arc<S>, verifier: Arc<V>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            verifier,
            token_issuer,
        }
    }

    async fn verified_email(
        &self,
        idp_token: &str,
        provider: Provider,
    ) -> Result<EmailAddress, UserError> {
        let email = self.verifier.verify_email(idp_token, provider).await?;

        // A provider returning a malformed email claim is treated as a failed
        // verification, never as a recoverable validation problem.
        EmailAddress::new(&email).map_err(|e| {
            tracing::error!(provider = %provider, "Verified claim carried an unusable email: {e}");
            UserError::IdentityVerification(VerifyError::InvalidToken(e.to_string()))
        })
    }
}

#[async_trait]
impl<S, V> OnboardingServicePort for OnboardingService<S, V>
where
    S: UserStore,
    V: IdentityVerifier,
{
    async fn login(
        &self,
        idp_token: &str,
        provider: Provider,
    ) -> Result<UserAccess, UserError> {
        let email = self.verified_email(idp_token, provider).await?;

        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| UserError::NotRegistered(email.to_string()))?;

        let tokens = self.token_issuer.issue_pair(&user.id.to_string())?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(UserAccess { user, tokens })
    }

    async fn check_availability(
        &self,
        idp_token: &str,
        provider: Provider,
    ) -> Result<(), UserError> {
        let email = self.verified_email(idp_token, provider).await?;

        match self.store.find_by_email(&email).await? {
            Some(user) => {
                tracing::info!(user_id = %user.id, "Signup availability check hit an existing user");
                Err(UserError::AlreadyRegistered(email.to_string()))
            }
            None => Ok(()),
        }
    }

    async fn complete_signup(
        &self,
        idp_token: &str,
        provider: Provider,
        profile: Profile,
    ) -> Result<UserAccess, UserError> {
        let email = self.verified_email(idp_token, provider).await?;

        let new_user = NewUser {
            email,
            role: Role::Customer,
            profile,
        };

        // The insert is the sole commit point; duplicate races resolve through
        // the store's unique constraints.
        let user = self.store.create(new_user).await?;
        let tokens = self.token_issuer.issue_pair(&user.id.to_string())?;

        tracing::info!(user_id = %user.id, "User completed signup");
        Ok(UserAccess { user, tokens })
    }

    async fn register(&self, command: CreateUserCommand) -> Result<UserAccess, UserError> {
        let new_user = NewUser {
            email: command.email,
            role: Role::Customer,
            profile: command.profile,
        };

        let user = self.store.create(new_user).await?;
        let tokens = self.token_issuer.issue_pair(&user.id.to_string())?;

        tracing::info!(user_id = %user.id, "User registered directly");
        Ok(UserAccess { user, tokens })
    }

    async fn get_profile(&self, email: &EmailAddress) -> Result<User, UserError> {
        self.store
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }
}
