use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use std::sync::Arc;
use tracing::info;

use crate::api::rest::dto::{MessageDto, ProductDto, ProductReq};
use crate::api::rest::error::ApiError;
use crate::domain::service::Service;

pub async fn create(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<ProductReq>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    info!("Creating product '{}'", req.name);
    let created = svc.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ProductDto::from(created))))
}

pub async fn update(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
    Json(req): Json<ProductReq>,
) -> Result<Json<ProductDto>, ApiError> {
    let updated = svc.update(id, req.into()).await?;
    Ok(Json(ProductDto::from(updated)))
}

pub async fn delete(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageDto>, ApiError> {
    svc.delete(id).await?;
    Ok(Json(MessageDto {
        message: "Produit supprimé avec succès".to_string(),
    }))
}

pub async fn get(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<Json<ProductDto>, ApiError> {
    let found = svc.get(id).await?;
    Ok(Json(ProductDto::from(found)))
}

pub async fn list(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let rows = svc.list_all().await?;
    Ok(Json(rows.into_iter().map(ProductDto::from).collect()))
}

pub async fn list_by_category(
    Extension(svc): Extension<Arc<Service>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let rows = svc.list_by_category(&category).await?;
    Ok(Json(rows.into_iter().map(ProductDto::from).collect()))
}

pub async fn list_by_sub_category(
    Extension(svc): Extension<Arc<Service>>,
    Path(sub_category): Path<String>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let rows = svc.list_by_sub_category(&sub_category).await?;
    Ok(Json(rows.into_iter().map(ProductDto::from).collect()))
}

pub async fn list_by_stock(
    Extension(svc): Extension<Arc<Service>>,
    Path(in_stock): Path<bool>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let rows = svc.list_by_stock(in_stock).await?;
    Ok(Json(rows.into_iter().map(ProductDto::from).collect()))
}
