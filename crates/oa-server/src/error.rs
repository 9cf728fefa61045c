//! Unified API error type with Axum `IntoResponse` support.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use oa_protocol::MissingDataError;

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// Farm data lacked fields a prediction needs.
    #[error(transparent)]
    MissingData(#[from] MissingDataError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        let body = match &self {
            ApiError::MissingData(missing) => json!({
                "error": self.to_string(),
                "status": status.as_u16(),
                "required": missing.required,
                "provided": missing.provided,
                "missing": missing.missing,
            }),
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Internal(msg) => {
                json!({
                    "error": msg,
                    "status": status.as_u16(),
                })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
