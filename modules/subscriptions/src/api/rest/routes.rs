use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Routes for the subscription lifecycle.
/// Mounted by the server under `/api/subscriptions`.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/assign/{user_id}", post(handlers::assign))
        .route("/update/{id}", put(handlers::update))
        .route("/delete/{id}", delete(handlers::delete))
        .route("/all", get(handlers::list))
        .route("/{id}", get(handlers::get))
        .layer(Extension(service))
}
