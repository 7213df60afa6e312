use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use fairway_reserve::ReservationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    AuthenticationError(String),
    #[error("{0}")]
    AuthorizationError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    GoneError(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        let msg = err.to_string();
        match err {
            ReservationError::NotFound(_) => AppError::NotFoundError(msg),
            ReservationError::Conflict { .. } | ReservationError::AlreadyRecorded(_) => {
                AppError::ConflictError(msg)
            }
            ReservationError::Expired(_) => AppError::GoneError(msg),
            ReservationError::Forbidden(_) => AppError::AuthorizationError(msg),
            ReservationError::Validation(_) => AppError::ValidationError(msg),
            store_err @ ReservationError::Store(_) => {
                AppError::Internal(anyhow::anyhow!(store_err))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::GoneError(msg) => (StatusCode::GONE, msg),
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
