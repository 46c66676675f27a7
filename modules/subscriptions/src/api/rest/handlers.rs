use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use std::sync::Arc;
use tracing::info;

use crate::api::rest::dto::{MessageDto, SubscriptionDto, SubscriptionTypeQuery};
use crate::api::rest::error::ApiError;
use crate::contract::model::SubscriptionType;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

fn parse_type(raw: &str) -> Result<SubscriptionType, ApiError> {
    SubscriptionType::parse(raw).ok_or_else(|| ApiError(DomainError::invalid_type(raw)))
}

pub async fn assign(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<i64>,
    Query(query): Query<SubscriptionTypeQuery>,
) -> Result<(StatusCode, Json<SubscriptionDto>), ApiError> {
    info!("Assigning {} subscription to user {user_id}", query.subscription_type);
    let plan = parse_type(&query.subscription_type)?;
    let assigned = svc.assign(user_id, plan).await?;
    Ok((StatusCode::CREATED, Json(SubscriptionDto::from(assigned))))
}

pub async fn update(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
    Query(query): Query<SubscriptionTypeQuery>,
) -> Result<Json<SubscriptionDto>, ApiError> {
    info!("Updating subscription {id} to {}", query.subscription_type);
    let plan = parse_type(&query.subscription_type)?;
    let updated = svc.update(id, plan).await?;
    Ok(Json(SubscriptionDto::from(updated)))
}

pub async fn delete(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageDto>, ApiError> {
    svc.delete(id).await?;
    Ok(Json(MessageDto {
        message: "Abonnement supprimé avec succès".to_string(),
    }))
}

pub async fn list(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<SubscriptionDto>>, ApiError> {
    let rows = svc.list().await?;
    Ok(Json(rows.into_iter().map(SubscriptionDto::from).collect()))
}

pub async fn get(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionDto>, ApiError> {
    let found = svc.get(id).await?;
    Ok(Json(SubscriptionDto::from(found)))
}
