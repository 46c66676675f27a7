use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::error;

use crate::domain::error::DomainError;

/// Flat `{"error": …}` body with the status code the client contract expects.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::EmailAlreadyExists => StatusCode::CONFLICT,
            DomainError::MatriculeNotInRoster | DomainError::MissingField { .. } => {
                StatusCode::BAD_REQUEST
            }
            DomainError::BadCredentials => StatusCode::UNAUTHORIZED,
            DomainError::UserNotFound => StatusCode::NOT_FOUND,
            DomainError::WelcomeMailFailed | DomainError::Database { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self.0);
        }
        let message = match &self.0 {
            // Full detail stays in the log.
            DomainError::Database { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
