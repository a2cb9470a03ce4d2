use axum::async_trait;
use axum::body::Bytes;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use thiserror::Error;

use crate::inbound::http::handlers::ApiError;

/// Classified JSON decode failure.
///
/// A closed taxonomy: every structural decode problem lands in exactly one
/// variant, and each variant has a fixed HTTP status. The 400 class carries a
/// user-facing message; `Read` does not expose its detail to the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Request body contains badly-formed JSON (at line {line}, column {column})")]
    Syntax { line: usize, column: usize },

    #[error("Request body contains badly-formed JSON")]
    UnexpectedEof,

    #[error("Request body contains an invalid value for the '{field}' field: {detail} (at line {line}, column {column})")]
    InvalidValue {
        field: String,
        detail: String,
        line: usize,
        column: usize,
    },

    #[error("Unknown field '{field}' in request")]
    UnknownField { field: String },

    #[error("Request body must not be empty")]
    EmptyBody,

    #[error("Error reading and verifying request: {0}")]
    Read(String),
}

impl DecodeError {
    pub fn status(&self) -> StatusCode {
        match self {
            DecodeError::Read(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl DecodeError {
    /// Classify a path-tracked deserialization failure.
    ///
    /// serde itself does not expose which field a type mismatch landed on, so
    /// decoding runs through `serde_path_to_error` and the recorded path
    /// becomes the field name in `InvalidValue`.
    fn classify(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let field = err.path().to_string();
        let err = err.into_inner();
        let (line, column) = (err.line(), err.column());
        match err.classify() {
            Category::Syntax => DecodeError::Syntax { line, column },
            Category::Eof => DecodeError::UnexpectedEof,
            Category::Data => {
                // serde reports unknown fields through the same category as
                // type mismatches; the field name only exists in the message.
                match unknown_field_name(&err.to_string()) {
                    Some(field) => DecodeError::UnknownField { field },
                    None => DecodeError::InvalidValue {
                        field,
                        detail: strip_location(&err.to_string()),
                        line,
                        column,
                    },
                }
            }
            Category::Io => DecodeError::Read(err.to_string()),
        }
    }
}

fn unknown_field_name(message: &str) -> Option<String> {
    let rest = message.strip_prefix("unknown field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// serde_json appends " at line L column C" to its messages; the variant
/// already carries the location.
fn strip_location(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

/// Strict JSON extractor.
///
/// Rejects empty bodies and, combined with `#[serde(deny_unknown_fields)]` on
/// the request shapes, any field not declared on the target. Structural
/// decoding only; semantic field validation is a separate pass owned by each
/// request type.
pub struct StrictJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| DecodeError::Read(e.to_string()))?;

        if bytes.is_empty() {
            return Err(DecodeError::EmptyBody.into());
        }

        let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
        let value = serde_path_to_error::deserialize(deserializer).map_err(DecodeError::classify)?;
        Ok(StrictJson(value))
    }
}
