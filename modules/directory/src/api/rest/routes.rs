use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::cabinets::CabinetService;
use crate::domain::profiles::ProfileService;
use crate::domain::roster::RosterService;

/// Routes for cabinet listings.
/// Mounted by the server under `/api/cabinets`.
pub fn cabinets_router(service: Arc<CabinetService>) -> Router {
    Router::new()
        .route("/add", post(handlers::add_cabinet))
        .route("/all", get(handlers::list_cabinets))
        .route("/update/{id}", put(handlers::update_cabinet))
        .route("/delete/{id}", delete(handlers::delete_cabinet))
        .route("/upload-excel", post(handlers::upload_cabinets_excel))
        .layer(Extension(service))
}

/// Routes for the roster and veterinarian profiles.
/// Mounted by the server under `/api/veterinaires`.
pub fn veterinaires_router(roster: Arc<RosterService>, profiles: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/all", get(handlers::list_veterinaires))
        .route("/upload-excel", post(handlers::upload_roster_excel))
        .route("/update", post(handlers::update_profile))
        .layer(Extension(roster))
        .layer(Extension(profiles))
}
