use auth::idp::ProviderParseError;
use auth::Provider;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserAccessData;
use crate::inbound::http::decode::StrictJson;
use crate::inbound::http::extract::Bearer;
use crate::inbound::http::router::AppState;
use crate::user::models::Dni;
use crate::user::models::Profile;

pub async fn signup(
    State(state): State<AppState>,
    bearer: Bearer,
    StrictJson(body): StrictJson<SignupRequest>,
) -> Result<ApiSuccess<SignupResponseData>, ApiError> {
    match body.try_into_command()? {
        SignupCommand::CheckAvailability { provider } => {
            state
                .onboarding
                .check_availability(&bearer.0, provider)
                .await?;
            Ok(ApiSuccess::new(
                StatusCode::OK,
                SignupResponseData::Available {
                    message: "Email available for signup".to_string(),
                },
            ))
        }
        SignupCommand::Complete { provider, profile } => state
            .onboarding
            .complete_signup(&bearer.0, provider, profile)
            .await
            .map_err(ApiError::from)
            .map(|ref access| {
                ApiSuccess::new(StatusCode::OK, SignupResponseData::Registered(access.into()))
            }),
    }
}

/// HTTP request body for the two-step signup flow (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignupRequest {
    step: String,
    idp: String,
    user_info: Option<UserInfoRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserInfoRequest {
    dni: String,
    name: String,
    lastname_main: String,
    lastname_secondary: String,
    address: String,
}

/// Validated signup request, branched by step.
#[derive(Debug)]
enum SignupCommand {
    CheckAvailability { provider: Provider },
    Complete { provider: Provider, profile: Profile },
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("Missing required 'idp' field")]
    MissingIdp,

    #[error("Invalid 'idp' value")]
    InvalidIdp(#[source] ProviderParseError),

    #[error("Invalid 'step' value")]
    InvalidStep,

    #[error("Missing User Information in 'user_info' field")]
    MissingUserInfo,

    #[error("user_info missing required '{0}' field")]
    MissingUserInfoField(&'static str),
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ParseSignupRequestError> {
        if self.idp.is_empty() {
            return Err(ParseSignupRequestError::MissingIdp);
        }
        let provider = self
            .idp
            .parse::<Provider>()
            .map_err(ParseSignupRequestError::InvalidIdp)?;

        match self.step.as_str() {
            // Step 1 is a pure availability check; any profile payload is ignored.
            "1" => Ok(SignupCommand::CheckAvailability { provider }),
            "2" => {
                let user_info = self
                    .user_info
                    .ok_or(ParseSignupRequestError::MissingUserInfo)?;
                let profile = user_info.try_into_profile()?;
                Ok(SignupCommand::Complete { provider, profile })
            }
            _ => Err(ParseSignupRequestError::InvalidStep),
        }
    }
}

impl UserInfoRequest {
    fn try_into_profile(self) -> Result<Profile, ParseSignupRequestError> {
        let dni = Dni::new(self.dni)
            .map_err(|_| ParseSignupRequestError::MissingUserInfoField("dni"))?;
        if self.name.is_empty() {
            return Err(ParseSignupRequestError::MissingUserInfoField("name"));
        }
        if self.lastname_main.is_empty() {
            return Err(ParseSignupRequestError::MissingUserInfoField("lastname_main"));
        }
        if self.lastname_secondary.is_empty() {
            return Err(ParseSignupRequestError::MissingUserInfoField(
                "lastname_secondary",
            ));
        }
        if self.address.is_empty() {
            return Err(ParseSignupRequestError::MissingUserInfoField("address"));
        }

        Ok(Profile {
            dni,
            name: self.name,
            lastname_main: self.lastname_main,
            lastname_secondary: self.lastname_secondary,
            address: self.address,
        })
    }
}

impl From<ParseSignupRequestError> for ApiError {
    fn from(err: ParseSignupRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SignupResponseData {
    Available { message: String },
    Registered(UserAccessData),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_info() -> UserInfoRequest {
        UserInfoRequest {
            dni: "45879652".to_string(),
            name: "Ana".to_string(),
            lastname_main: "Quispe".to_string(),
            lastname_secondary: "Mamani".to_string(),
            address: "Av. Arequipa 123, Lima".to_string(),
        }
    }

    #[test]
    fn test_step_one_ignores_profile_payload() {
        let request = SignupRequest {
            step: "1".to_string(),
            idp: "google".to_string(),
            user_info: Some(UserInfoRequest::default()),
        };

        assert!(matches!(
            request.try_into_command().unwrap(),
            SignupCommand::CheckAvailability {
                provider: Provider::Google
            }
        ));
    }

    #[test]
    fn test_step_two_requires_user_info() {
        let request = SignupRequest {
            step: "2".to_string(),
            idp: "google".to_string(),
            user_info: None,
        };

        assert!(matches!(
            request.try_into_command(),
            Err(ParseSignupRequestError::MissingUserInfo)
        ));
    }

    #[test]
    fn test_step_two_rejects_empty_dni() {
        let request = SignupRequest {
            step: "2".to_string(),
            idp: "google".to_string(),
            user_info: Some(UserInfoRequest {
                dni: String::new(),
                ..user_info()
            }),
        };

        let err = request.try_into_command().unwrap_err();
        assert_eq!(err.to_string(), "user_info missing required 'dni' field");
    }

    #[test]
    fn test_step_two_builds_profile() {
        let request = SignupRequest {
            step: "2".to_string(),
            idp: "google".to_string(),
            user_info: Some(user_info()),
        };

        match request.try_into_command().unwrap() {
            SignupCommand::Complete { provider, profile } => {
                assert_eq!(provider, Provider::Google);
                assert_eq!(profile.dni.as_str(), "45879652");
                assert_eq!(profile.lastname_secondary, "Mamani");
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_step_value() {
        let request = SignupRequest {
            step: "3".to_string(),
            idp: "google".to_string(),
            user_info: None,
        };

        assert!(matches!(
            request.try_into_command(),
            Err(ParseSignupRequestError::InvalidStep)
        ));
    }

    #[test]
    fn test_idp_validated_before_step() {
        let request = SignupRequest {
            step: "9".to_string(),
            idp: String::new(),
            user_info: None,
        };

        assert!(matches!(
            request.try_into_command(),
            Err(ParseSignupRequestError::MissingIdp)
        ));
    }
}
