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
            DomainError::UserNotFound | DomainError::SubscriptionNotFound => StatusCode::NOT_FOUND,
            DomainError::AlreadySubscribed => StatusCode::CONFLICT,
            DomainError::InvalidType { .. } => StatusCode::BAD_REQUEST,
            DomainError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self.0);
        }
        let message = match &self.0 {
            DomainError::Database { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
