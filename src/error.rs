use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Everything the service can fail with. Each variant maps to a distinct
/// HTTP status so front ends can tell bad input from upstream trouble.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unknown meal: {0}")]
    UnknownMeal(String),
    #[error("AI provider request failed: {0}")]
    Network(String),
    #[error("Could not parse AI response")]
    Parse { raw: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::UnknownMeal(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Network(_) | AppError::Parse { .. } => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let raw_response = match &self {
            AppError::Parse { raw } => Some(raw.clone()),
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            raw_response,
        };

        (status, Json(body)).into_response()
    }
}
