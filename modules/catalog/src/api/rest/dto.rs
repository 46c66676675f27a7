use serde::{Deserialize, Serialize};

use crate::contract::model::{NewProduct, Product};

/// Product fields as submitted on create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReq {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub in_stock: bool,
    pub details_url: Option<String>,
}

/// REST DTO for a stored product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
    pub sub_category: String,
    pub in_stock: bool,
    pub details_url: Option<String>,
}

/// Generic `{"message": …}` success body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub message: String,
}

impl From<ProductReq> for NewProduct {
    fn from(r: ProductReq) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            image_url: r.image_url,
            category: r.category,
            sub_category: r.sub_category,
            in_stock: r.in_stock,
            details_url: r.details_url,
        }
    }
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
            category: p.category,
            sub_category: p.sub_category,
            in_stock: p.in_stock,
            details_url: p.details_url,
        }
    }
}
