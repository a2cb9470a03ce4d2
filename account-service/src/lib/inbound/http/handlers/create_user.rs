use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserAccessData;
use crate::inbound::http::decode::StrictJson;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::models::CreateUserCommand;
use crate::user::models::Dni;
use crate::user::models::EmailAddress;
use crate::user::models::Profile;

pub async fn create_user(
    State(state): State<AppState>,
    StrictJson(body): StrictJson<CreateUserRequest>,
) -> Result<ApiSuccess<UserAccessData>, ApiError> {
    state
        .onboarding
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref access| ApiSuccess::new(StatusCode::CREATED, access.into()))
}

/// HTTP request body for direct registration (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateUserRequest {
    email: String,
    dni: String,
    name: String,
    lastname_main: String,
    lastname_secondary: String,
    address: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("Missing required '{0}' field")]
    MissingField(&'static str),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        if self.email.is_empty() {
            return Err(ParseCreateUserRequestError::MissingField("email"));
        }
        let email = EmailAddress::new(&self.email)?;

        if self.dni.is_empty() {
            return Err(ParseCreateUserRequestError::MissingField("dni"));
        }
        let dni =
            Dni::new(self.dni).map_err(|_| ParseCreateUserRequestError::MissingField("dni"))?;
        if self.name.is_empty() {
            return Err(ParseCreateUserRequestError::MissingField("name"));
        }
        if self.lastname_main.is_empty() {
            return Err(ParseCreateUserRequestError::MissingField("lastname_main"));
        }
        if self.lastname_secondary.is_empty() {
            return Err(ParseCreateUserRequestError::MissingField("lastname_secondary"));
        }
        if self.address.is_empty() {
            return Err(ParseCreateUserRequestError::MissingField("address"));
        }

        Ok(CreateUserCommand {
            email,
            profile: Profile {
                dni,
                name: self.name,
                lastname_main: self.lastname_main,
                lastname_secondary: self.lastname_secondary,
                address: self.address,
            },
        })
    }
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            email: "Jose@Example.com".to_string(),
            dni: "45879652".to_string(),
            name: "Jose".to_string(),
            lastname_main: "Huaman".to_string(),
            lastname_secondary: "Flores".to_string(),
            address: "Jr. Union 456, Cusco".to_string(),
        }
    }

    #[test]
    fn test_command_normalizes_email() {
        let command = request().try_into_command().unwrap();
        assert_eq!(command.email.as_str(), "jose@example.com");
        assert_eq!(command.profile.dni.as_str(), "45879652");
    }

    #[test]
    fn test_missing_email() {
        let err = CreateUserRequest {
            email: String::new(),
            ..request()
        }
        .try_into_command()
        .unwrap_err();

        assert_eq!(err.to_string(), "Missing required 'email' field");
    }

    #[test]
    fn test_invalid_email() {
        let err = CreateUserRequest {
            email: "not-an-email".to_string(),
            ..request()
        }
        .try_into_command()
        .unwrap_err();

        assert!(matches!(err, ParseCreateUserRequestError::Email(_)));
    }

    #[test]
    fn test_missing_lastname_secondary() {
        let err = CreateUserRequest {
            lastname_secondary: String::new(),
            ..request()
        }
        .try_into_command()
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required 'lastname_secondary' field"
        );
    }
}
