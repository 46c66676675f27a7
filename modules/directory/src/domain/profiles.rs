use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::contract::model::Profile;
use crate::domain::error::DomainError;
use crate::domain::repo::ProfilesRepository;

/// An uploaded portrait: original file name plus contents.
#[derive(Debug, Clone)]
pub struct ProfileImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Maintains per-user veterinary profiles; the portrait lands under the
/// configured media directory and only its relative path is stored.
#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfilesRepository>,
    media_dir: PathBuf,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn ProfilesRepository>, media_dir: PathBuf) -> Self {
        Self { repo, media_dir }
    }

    /// Create or update a user's profile; both fields are optional and an
    /// absent field leaves the stored value untouched.
    #[instrument(name = "directory.profiles.update", skip(self, image))]
    pub async fn update_profile(
        &self,
        user_id: i64,
        image: Option<ProfileImage>,
        subscription_type_hint: Option<String>,
    ) -> Result<Profile, DomainError> {
        let image_path = match image {
            Some(image) => Some(self.store_image(user_id, image).await?),
            None => None,
        };

        let existing = self
            .repo
            .find_by_user(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        match existing {
            Some(profile) => {
                let hint = subscription_type_hint.or(profile.subscription_type_hint.clone());
                let path = image_path.or(profile.image_path.clone());
                self.repo
                    .update(profile.id, hint.clone(), path.clone())
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))?;
                info!("Profil vétérinaire mis à jour pour l'utilisateur {user_id}");
                Ok(Profile {
                    subscription_type_hint: hint,
                    image_path: path,
                    ..profile
                })
            }
            None => {
                let created = self
                    .repo
                    .insert(user_id, subscription_type_hint, image_path)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))?;
                info!("Profil vétérinaire créé pour l'utilisateur {user_id}");
                Ok(created)
            }
        }
    }

    async fn store_image(&self, user_id: i64, image: ProfileImage) -> Result<String, DomainError> {
        let safe_name: String = image
            .file_name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        let relative = format!("veterinaires/{user_id}_{safe_name}");
        let target = self.media_dir.join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::database(format!("media dir: {e}")))?;
        }
        tokio::fs::write(&target, &image.bytes)
            .await
            .map_err(|e| DomainError::database(format!("image write: {e}")))?;

        Ok(relative)
    }
}
