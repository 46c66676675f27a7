use async_trait::async_trait;

use crate::contract::model::{NewProduct, Product};

/// Port for the domain layer: persistence operations on products.
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Product>>;
    async fn insert(&self, product: NewProduct, image_url: String) -> anyhow::Result<Product>;
    async fn update(&self, id: i64, product: NewProduct, image_url: String)
        -> anyhow::Result<Product>;
    async fn delete(&self, id: i64) -> anyhow::Result<()>;
    async fn list_all(&self) -> anyhow::Result<Vec<Product>>;
    async fn list_by_category(&self, category: &str) -> anyhow::Result<Vec<Product>>;
    async fn list_by_sub_category(&self, sub_category: &str) -> anyhow::Result<Vec<Product>>;
    async fn list_by_stock(&self, in_stock: bool) -> anyhow::Result<Vec<Product>>;
}
