use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// One failing field in a rejected request body.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        FieldError::new(field, "Required")
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// 400 with a bare message and no field detail.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// 400 listing the fields that failed schema validation.
    pub fn invalid_data(errors: Vec<FieldError>) -> Self {
        AppError::Validation {
            message: "Invalid data".to_string(),
            errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation { message, errors } => {
                let mut body = json!({ "message": message });
                if !errors.is_empty() {
                    body["errors"] = json!(errors);
                }
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "message": message })),
            AppError::S3(detail) => {
                tracing::error!("S3 error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "A storage error occurred" }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "An internal server error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
