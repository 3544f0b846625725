use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::GatewayError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The body keeps the `{"detail": ...}` field existing clients read, plus a
/// `code` that tells the error kinds apart.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::Gateway(e) => {
                tracing::error!("Upstream error ({}): {e}", e.code());
                (StatusCode::INTERNAL_SERVER_ERROR, e.code(), e.to_string())
            }
        };

        let body = Json(json!({
            "detail": detail,
            "code": code
        }));

        (status, body).into_response()
    }
}
