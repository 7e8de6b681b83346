//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                PricingErrorResponse {
                    error_type: "not_found".to_string(),
                    message: "Not found".to_string(),
                    details: None,
                },
            ),
            AppError::BadRequest { message, details } => (
                StatusCode::BAD_REQUEST,
                PricingErrorResponse {
                    error_type: "bad_request".to_string(),
                    message,
                    details,
                },
            ),
            AppError::Pricing(e) => {
                let status = match e {
                    PricingError::Validation { .. } => StatusCode::BAD_REQUEST,
                    PricingError::Configuration { .. } => {
                        tracing::error!("Pricing configuration error: {}", e);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (
                    status,
                    PricingErrorResponse {
                        error_type: e.error_type().to_string(),
                        message: e.to_string(),
                        details: Some(serde_json::json!({ "field": e.field() })),
                    },
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PricingErrorResponse {
                        error_type: "database_error".to_string(),
                        message: "Database error".to_string(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
