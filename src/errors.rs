use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

use crate::services::price_series::DataFormatError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            AppError::Store(StoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, msg).into_response()
            }
            AppError::DataFormat(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
            }
            AppError::Store(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
