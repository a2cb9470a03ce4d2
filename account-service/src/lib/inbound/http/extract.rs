use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{self};

use crate::inbound::http::handlers::ApiError;

/// Bearer token pulled from the Authorization header.
///
/// Runs as a parts extractor, so a missing or empty header rejects with 401
/// before the request body is ever decoded.
#[derive(Debug, Clone)]
pub struct Bearer(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .ok_or_else(|| {
                ApiError::Unauthorized("No token provided in Authorization header".to_string())
            })?;

        let value = header
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?
            .trim();

        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            return Err(ApiError::Unauthorized(
                "No token provided in Authorization header".to_string(),
            ));
        }

        Ok(Bearer(token.to_string()))
    }
}
