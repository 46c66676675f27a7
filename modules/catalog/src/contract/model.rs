/// A catalog product; unrelated to the veterinary entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
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

/// Product fields as submitted on create/update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub category: String,
    pub sub_category: String,
    pub in_stock: bool,
    pub details_url: Option<String>,
}
