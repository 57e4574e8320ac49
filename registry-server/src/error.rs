//! API error mapping: domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use registry_core::RegistryError;

/// Transport wrapper around the domain error taxonomy.
///
/// Validation failures return the full field-error array; conflicts and
/// not-found return a single message; store errors are logged and
/// surfaced as a generic 500 without internal detail.
#[derive(Debug)]
pub struct ApiError(RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            RegistryError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": errors }))
            }
            RegistryError::Conflict(message) => {
                (StatusCode::CONFLICT, json!({ "error": message }))
            }
            RegistryError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Student not found" }),
            ),
            RegistryError::Store(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
