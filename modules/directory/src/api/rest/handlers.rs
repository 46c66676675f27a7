use axum::{
    extract::{Multipart, Path},
    http::StatusCode,
    response::Json,
    Extension,
};
use std::sync::Arc;
use tracing::info;

use crate::api::rest::dto::{
    CabinetDto, CabinetReq, ImportSummaryDto, MessageDto, RosterEntryDto,
};
use crate::api::rest::error::ApiError;
use crate::domain::cabinets::CabinetService;
use crate::domain::error::DomainError;
use crate::domain::profiles::{ProfileImage, ProfileService};
use crate::domain::roster::RosterService;

// --- cabinets ---

pub async fn add_cabinet(
    Extension(svc): Extension<Arc<CabinetService>>,
    Json(req): Json<CabinetReq>,
) -> Result<(StatusCode, Json<CabinetDto>), ApiError> {
    info!("Saving cabinet '{}'", req.name);
    let saved = svc.save(req.into()).await?;
    Ok((StatusCode::CREATED, Json(CabinetDto::from(saved))))
}

pub async fn list_cabinets(
    Extension(svc): Extension<Arc<CabinetService>>,
) -> Result<Json<Vec<CabinetDto>>, ApiError> {
    let cabinets = svc.list_all().await?;
    Ok(Json(cabinets.into_iter().map(CabinetDto::from).collect()))
}

pub async fn update_cabinet(
    Extension(svc): Extension<Arc<CabinetService>>,
    Path(id): Path<i64>,
    Json(req): Json<CabinetReq>,
) -> Result<Json<CabinetDto>, ApiError> {
    info!("Updating cabinet {id}");
    let updated = svc.update(id, req.into()).await?;
    Ok(Json(CabinetDto::from(updated)))
}

pub async fn delete_cabinet(
    Extension(svc): Extension<Arc<CabinetService>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageDto>, ApiError> {
    svc.delete(id).await?;
    Ok(Json(MessageDto {
        message: "Cabinet vétérinaire supprimé avec succès".to_string(),
    }))
}

pub async fn upload_cabinets_excel(
    Extension(svc): Extension<Arc<CabinetService>>,
    multipart: Multipart,
) -> Result<Json<ImportSummaryDto>, ApiError> {
    let bytes = file_field(multipart).await?;
    let summary = svc.import_xlsx(&bytes).await?;
    Ok(Json(ImportSummaryDto::from(summary)))
}

// --- roster / veterinarians ---

pub async fn list_veterinaires(
    Extension(svc): Extension<Arc<RosterService>>,
) -> Result<Json<Vec<RosterEntryDto>>, ApiError> {
    let entries = svc.list_all().await?;
    Ok(Json(entries.into_iter().map(RosterEntryDto::from).collect()))
}

pub async fn upload_roster_excel(
    Extension(svc): Extension<Arc<RosterService>>,
    multipart: Multipart,
) -> Result<Json<ImportSummaryDto>, ApiError> {
    let bytes = file_field(multipart).await?;
    let summary = svc.import_xlsx(&bytes).await?;
    Ok(Json(ImportSummaryDto::from(summary)))
}

/// Multipart profile update: `userId` (required), `image` (optional file),
/// `subscriptionType` (optional).
pub async fn update_profile(
    Extension(svc): Extension<Arc<ProfileService>>,
    mut multipart: Multipart,
) -> Result<Json<MessageDto>, ApiError> {
    let mut user_id: Option<i64> = None;
    let mut image: Option<ProfileImage> = None;
    let mut subscription_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::invalid_file(e.to_string()))?
    {
        match field.name() {
            Some("userId") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| DomainError::invalid_file(e.to_string()))?;
                user_id = Some(
                    raw.parse()
                        .map_err(|_| DomainError::missing_field("userId"))?,
                );
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| DomainError::invalid_file(e.to_string()))?;
                image = Some(ProfileImage {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            Some("subscriptionType") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| DomainError::invalid_file(e.to_string()))?;
                if !raw.trim().is_empty() {
                    subscription_type = Some(raw);
                }
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| DomainError::missing_field("userId"))?;
    svc.update_profile(user_id, image, subscription_type).await?;
    Ok(Json(MessageDto {
        message: "Profil vétérinaire mis à jour avec succès".to_string(),
    }))
}

/// Pull the `file` part out of a multipart upload.
async fn file_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::invalid_file(e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| DomainError::invalid_file(e.to_string()))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError(DomainError::EmptyFile))
}
