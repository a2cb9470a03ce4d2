use auth::TokenPair;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::inbound::http::decode::DecodeError;
use crate::user::errors::UserError;
use crate::user::models::User;
use crate::user::models::UserAccess;

pub mod create_user;
pub mod get_user;
pub mod login;
pub mod signup;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                // Internal detail is logged, never exposed to the caller.
                tracing::error!(error = %msg, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotRegistered(_) | UserError::NotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            UserError::AlreadyRegistered(_)
            | UserError::EmailAlreadyExists(_)
            | UserError::DniAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::IdentityVerification(_) => ApiError::Unauthorized(err.to_string()),
            UserError::InvalidEmail(_) | UserError::InvalidDni(_) | UserError::InvalidRole(_) => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::TokenIssuance(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        match err.status() {
            StatusCode::INTERNAL_SERVER_ERROR => ApiError::InternalServerError(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Stored profile as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub dni: String,
    pub name: String,
    pub lastname_main: String,
    pub lastname_secondary: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            email: user.email.as_str().to_string(),
            role: user.role.to_string(),
            dni: user.dni.as_str().to_string(),
            name: user.name.clone(),
            lastname_main: user.lastname_main.clone(),
            lastname_secondary: user.lastname_secondary.clone(),
            address: user.address.clone(),
            created_at: user.created_at,
        }
    }
}

/// Successful access-granting response: profile plus fresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccessData {
    pub user_info: UserData,
    pub tokens: TokenPair,
}

impl From<&UserAccess> for UserAccessData {
    fn from(access: &UserAccess) -> Self {
        Self {
            user_info: (&access.user).into(),
            tokens: access.tokens.clone(),
        }
    }
}
