use auth::idp::ProviderParseError;
use auth::Provider;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserAccessData;
use crate::inbound::http::decode::StrictJson;
use crate::inbound::http::extract::Bearer;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    bearer: Bearer,
    StrictJson(body): StrictJson<LoginRequest>,
) -> Result<ApiSuccess<UserAccessData>, ApiError> {
    // Body validation runs before the identity round-trip.
    let provider = body.validate()?;

    state
        .onboarding
        .login(&bearer.0, provider)
        .await
        .map_err(ApiError::from)
        .map(|ref access| ApiSuccess::new(StatusCode::OK, access.into()))
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoginRequest {
    idp: String,
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("Missing required 'idp' field")]
    MissingIdp,

    #[error("Invalid 'idp' value")]
    InvalidIdp(#[source] ProviderParseError),
}

impl LoginRequest {
    fn validate(&self) -> Result<Provider, ParseLoginRequestError> {
        if self.idp.is_empty() {
            return Err(ParseLoginRequestError::MissingIdp);
        }
        self.idp
            .parse::<Provider>()
            .map_err(ParseLoginRequestError::InvalidIdp)
    }
}

impl From<ParseLoginRequestError> for ApiError {
    fn from(err: ParseLoginRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
