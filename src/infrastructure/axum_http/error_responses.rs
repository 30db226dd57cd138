use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::domain::errors::CatalogError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Catalog(err) => match err {
                CatalogError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CatalogError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                CatalogError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CatalogError::Cancelled | CatalogError::DeadlineExceeded => {
                    (StatusCode::GATEWAY_TIMEOUT, err.to_string())
                }
                // Hub and resolver detail stays in the logs.
                CatalogError::Upstream(_) => {
                    (StatusCode::BAD_GATEWAY, "Upstream service failure".to_string())
                }
                CatalogError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "http: request failed");
        }

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}
