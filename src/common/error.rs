// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Single error type for the whole service. Handlers return it directly;
// `IntoResponse` below does the HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no eligible cleaning staff for this facility")]
    NoEligibleStaff,

    #[error("selected cleaner is not assigned to this facility")]
    IneligibleAssignee,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("an assignment already exists for this facility and date")]
    Conflict,

    #[error("invalid or missing authentication token")]
    InvalidToken,

    #[error("database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return every field-level detail the validator collected.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NoEligibleStaff => (
                StatusCode::BAD_REQUEST,
                "No cleaning staff is assigned to this facility.".to_string(),
            ),
            AppError::IneligibleAssignee => (
                StatusCode::BAD_REQUEST,
                "Selected cleaner is not assigned to this facility.".to_string(),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found.")),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.to_string()),
            AppError::Conflict => (
                StatusCode::CONFLICT,
                "An assignment already exists for this facility and date.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid or missing authentication token.".to_string(),
            ),

            // Everything else (DatabaseError, JwtError, InternalServerError) is a 500.
            // `tracing` logs the detailed message thiserror gave us.
            ref e => {
                tracing::error!("internal server error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
