use axum::{routing::get, routing::post, Extension, Router};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Routes for login, registration, listing and password reset.
/// Mounted by the server under `/api`.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/users/register", post(handlers::register))
        .route("/users/all", get(handlers::list_users))
        .route("/reset-password", post(handlers::reset_password))
        .layer(Extension(service))
}
