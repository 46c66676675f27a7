use axum::{http::StatusCode, response::Json, Extension};
use std::sync::Arc;
use tracing::info;

use crate::api::rest::dto::{LoginDto, LoginReq, MessageDto, RegisterReq, ResetPasswordReq, UserDto};
use crate::api::rest::error::ApiError;
use crate::auth::gate::AuthUser;
use crate::domain::service::Service;

pub async fn login(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<LoginReq>,
) -> Result<Json<LoginDto>, ApiError> {
    info!("Login attempt for {}", req.email);
    let outcome = svc.login(&req.email, &req.password).await?;
    Ok(Json(LoginDto::from(outcome)))
}

pub async fn register(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    info!("Registration request for {}", req.email);
    let message = svc.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(MessageDto { message })))
}

pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = svc.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

pub async fn reset_password(
    Extension(svc): Extension<Arc<Service>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ResetPasswordReq>,
) -> Result<Json<MessageDto>, ApiError> {
    svc.reset_password(&auth.email, &req.new_password).await?;
    Ok(Json(MessageDto {
        message: "Mot de passe mis à jour avec succès".to_string(),
    }))
}
