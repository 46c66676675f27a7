use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::contract::model::{NewProduct, Product};
use crate::domain::error::DomainError;
use crate::domain::ports::ProductImageLookup;
use crate::domain::repo::ProductsRepository;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x300?text=No+Image";

/// Domain service for the product catalog.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ProductsRepository>,
    images: Arc<dyn ProductImageLookup>,
}

impl Service {
    pub fn new(repo: Arc<dyn ProductsRepository>, images: Arc<dyn ProductImageLookup>) -> Self {
        Self { repo, images }
    }

    /// Create a product. When no image URL is supplied but a details URL is,
    /// the details page is searched for one; any miss or failure falls back
    /// to the placeholder so creation never depends on the remote page.
    #[instrument(name = "catalog.service.create", skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        self.validate(&product)?;
        let image_url = self.resolve_image(&product).await;
        let created = self
            .repo
            .insert(product, image_url)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        info!("Created product {}", created.id);
        Ok(created)
    }

    #[instrument(name = "catalog.service.update", skip(self, product))]
    pub async fn update(&self, id: i64, product: NewProduct) -> Result<Product, DomainError> {
        self.validate(&product)?;
        let existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::ProductNotFound { id })?;

        // A submitted image replaces the stored one; an absent field keeps
        // it. Scraping is create-only.
        let image_url = match &product.image_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => existing.image_url,
        };
        self.repo
            .update(id, product, image_url)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "catalog.service.delete", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::ProductNotFound { id })?;
        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    pub async fn get(&self, id: i64) -> Result<Product, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::ProductNotFound { id })
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        self.repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, DomainError> {
        self.repo
            .list_by_category(category)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    pub async fn list_by_sub_category(
        &self,
        sub_category: &str,
    ) -> Result<Vec<Product>, DomainError> {
        self.repo
            .list_by_sub_category(sub_category)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    pub async fn list_by_stock(&self, in_stock: bool) -> Result<Vec<Product>, DomainError> {
        self.repo
            .list_by_stock(in_stock)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    fn validate(&self, product: &NewProduct) -> Result<(), DomainError> {
        if product.name.trim().is_empty() {
            return Err(DomainError::missing_field("Le nom du produit"));
        }
        Ok(())
    }

    async fn resolve_image(&self, product: &NewProduct) -> String {
        if let Some(url) = &product.image_url {
            if !url.is_empty() {
                return url.clone();
            }
        }
        let Some(details_url) = &product.details_url else {
            return PLACEHOLDER_IMAGE_URL.to_string();
        };

        match self.images.lookup(details_url).await {
            Ok(Some(url)) => {
                info!("Scraped image for '{}': {url}", product.name);
                url
            }
            Ok(None) => {
                warn!("No image found on {details_url}");
                PLACEHOLDER_IMAGE_URL.to_string()
            }
            Err(e) => {
                warn!("Image lookup on {details_url} failed: {e}");
                PLACEHOLDER_IMAGE_URL.to_string()
            }
        }
    }
}
