use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Routes for the product catalog.
/// Mounted by the server under `/api/products`.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/all", get(handlers::list))
        .route("/category/{category}", get(handlers::list_by_category))
        .route(
            "/subcategory/{sub_category}",
            get(handlers::list_by_sub_category),
        )
        .route("/stock/{in_stock}", get(handlers::list_by_stock))
        .route("/", post(handlers::create))
        .route(
            "/{id}",
            get(handlers::get)
                .put(handlers::update)
                .delete(handlers::delete),
        )
        .layer(Extension(service))
}
