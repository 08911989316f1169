//! HTTP error rendering.
//!
//! Maps [`VaultError`] onto status codes and a JSON body. Internal failures
//! (crypto, storage) are logged with detail but rendered generically so the
//! response never leaks backend state.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokenvault_core::VaultError;

use crate::middleware::current_request_id;

/// An API-level error: a vault error on its way to becoming a response.
#[derive(Debug)]
pub struct ApiError(pub VaultError);

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        Self(err)
    }
}

/// Error response JSON.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            VaultError::Validation(message) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message.clone())
            }
            VaultError::Authentication => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.0.to_string())
            }
            VaultError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", "not found".to_string()),
            VaultError::Crypto(e) => {
                tracing::error!(error = %e, "crypto failure while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal error".to_string(),
                )
            }
            VaultError::Store(e) => {
                tracing::error!(error = %e, transient = e.is_transient(), "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "storage operation failed".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message, request_id: current_request_id() },
        };

        (status, Json(body)).into_response()
    }
}
