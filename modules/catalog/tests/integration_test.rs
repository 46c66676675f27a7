use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use catalog::{
    contract::model::{NewProduct, Product},
    domain::error::DomainError,
    domain::ports::ProductImageLookup,
    domain::repo::ProductsRepository,
    domain::service::{Service, PLACEHOLDER_IMAGE_URL},
};

#[derive(Default)]
struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
    next_id: Mutex<i64>,
}

impl InMemoryProducts {
    fn snapshot(&self) -> Vec<Product> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductsRepository for InMemoryProducts {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: NewProduct, image_url: String) -> Result<Product> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let stored = Product {
            id: *next,
            name: product.name,
            description: product.description,
            price: product.price,
            image_url,
            category: product.category,
            sub_category: product.sub_category,
            in_stock: product.in_stock,
            details_url: product.details_url,
        };
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, product: NewProduct, image_url: String) -> Result<Product> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow::anyhow!("no product {id}"))?;
        row.name = product.name;
        row.description = product.description;
        row.price = product.price;
        row.image_url = image_url;
        row.category = product.category;
        row.sub_category = product.sub_category;
        row.in_stock = product.in_stock;
        row.details_url = product.details_url;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.rows.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        Ok(self.snapshot())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    async fn list_by_sub_category(&self, sub_category: &str) -> Result<Vec<Product>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|p| p.sub_category == sub_category)
            .collect())
    }

    async fn list_by_stock(&self, in_stock: bool) -> Result<Vec<Product>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|p| p.in_stock == in_stock)
            .collect())
    }
}

/// Scripted image lookup: records the URLs asked about and answers with a
/// fixed result.
struct FakeImages {
    answer: Result<Option<String>, String>,
    asked: Mutex<Vec<String>>,
}

impl FakeImages {
    fn found(url: &str) -> Self {
        Self {
            answer: Ok(Some(url.to_string())),
            asked: Mutex::new(Vec::new()),
        }
    }

    fn missing() -> Self {
        Self {
            answer: Ok(None),
            asked: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            asked: Mutex::new(Vec::new()),
        }
    }

    fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductImageLookup for FakeImages {
    async fn lookup(&self, details_url: &str) -> Result<Option<String>> {
        self.asked.lock().unwrap().push(details_url.to_string());
        match &self.answer {
            Ok(found) => Ok(found.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}

fn croquettes(details_url: Option<&str>, image_url: Option<&str>) -> NewProduct {
    NewProduct {
        name: "Croquettes Vet Complex".to_string(),
        description: "Aliment complet pour chien adulte".to_string(),
        price: 54.9,
        image_url: image_url.map(str::to_string),
        category: "Alimentation".to_string(),
        sub_category: "Chien".to_string(),
        in_stock: true,
        details_url: details_url.map(str::to_string),
    }
}

#[tokio::test]
async fn create_scrapes_image_from_details_page() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::found("https://cdn.example.com/croquettes.jpg"));
    let service = Service::new(repo, images.clone());

    let created = service
        .create(croquettes(Some("https://shop.example.com/p/1"), None))
        .await?;

    assert_eq!(created.image_url, "https://cdn.example.com/croquettes.jpg");
    assert_eq!(images.asked(), vec!["https://shop.example.com/p/1"]);

    Ok(())
}

#[tokio::test]
async fn supplied_image_url_is_kept_without_scraping() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::found("https://cdn.example.com/other.jpg"));
    let service = Service::new(repo, images.clone());

    let created = service
        .create(croquettes(
            Some("https://shop.example.com/p/1"),
            Some("https://cdn.example.com/mine.png"),
        ))
        .await?;

    assert_eq!(created.image_url, "https://cdn.example.com/mine.png");
    assert!(images.asked().is_empty());

    Ok(())
}

#[tokio::test]
async fn missing_image_on_page_falls_back_to_placeholder() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::missing());
    let service = Service::new(repo, images);

    let created = service
        .create(croquettes(Some("https://shop.example.com/p/1"), None))
        .await?;
    assert_eq!(created.image_url, PLACEHOLDER_IMAGE_URL);

    Ok(())
}

#[tokio::test]
async fn lookup_failure_falls_back_to_placeholder() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::failing("connection refused"));
    let service = Service::new(repo, images);

    let created = service
        .create(croquettes(Some("https://shop.example.com/p/1"), None))
        .await?;
    assert_eq!(created.image_url, PLACEHOLDER_IMAGE_URL);

    Ok(())
}

#[tokio::test]
async fn create_without_details_url_uses_placeholder() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::missing());
    let service = Service::new(repo, images.clone());

    let created = service.create(croquettes(None, None)).await?;
    assert_eq!(created.image_url, PLACEHOLDER_IMAGE_URL);
    assert!(images.asked().is_empty());

    Ok(())
}

#[tokio::test]
async fn create_rejects_blank_name() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::missing());
    let service = Service::new(repo.clone(), images);

    let mut product = croquettes(None, None);
    product.name = "  ".to_string();
    let err = service.create(product).await.unwrap_err();
    assert!(matches!(err, DomainError::MissingField { .. }));
    assert!(repo.snapshot().is_empty());

    Ok(())
}

#[tokio::test]
async fn filters_select_by_category_sub_category_and_stock() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::missing());
    let service = Service::new(repo, images);

    let mut shampoo = croquettes(None, None);
    shampoo.name = "Shampoing dermatologique".to_string();
    shampoo.category = "Hygiène".to_string();
    shampoo.sub_category = "Chat".to_string();
    shampoo.in_stock = false;

    service.create(croquettes(None, None)).await?;
    service.create(shampoo).await?;

    let food = service.list_by_category("Alimentation").await?;
    assert_eq!(food.len(), 1);
    assert_eq!(food[0].name, "Croquettes Vet Complex");

    let cats = service.list_by_sub_category("Chat").await?;
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Shampoing dermatologique");

    let out_of_stock = service.list_by_stock(false).await?;
    assert_eq!(out_of_stock.len(), 1);
    assert_eq!(out_of_stock[0].name, "Shampoing dermatologique");

    Ok(())
}

#[tokio::test]
async fn update_without_image_keeps_the_stored_one() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::found("https://cdn.example.com/croquettes.jpg"));
    let service = Service::new(repo, images);

    let created = service
        .create(croquettes(Some("https://shop.example.com/p/1"), None))
        .await?;

    let mut changes = croquettes(Some("https://shop.example.com/p/1"), None);
    changes.price = 59.9;
    let updated = service.update(created.id, changes).await?;
    assert_eq!(updated.price, 59.9);
    assert_eq!(updated.image_url, "https://cdn.example.com/croquettes.jpg");

    let replaced = service
        .update(
            created.id,
            croquettes(None, Some("https://cdn.example.com/new.png")),
        )
        .await?;
    assert_eq!(replaced.image_url, "https://cdn.example.com/new.png");

    Ok(())
}

#[tokio::test]
async fn update_unknown_product_fails() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::missing());
    let service = Service::new(repo, images);

    let err = service.update(42, croquettes(None, None)).await.unwrap_err();
    assert!(matches!(err, DomainError::ProductNotFound { id: 42 }));

    Ok(())
}

// --- router surface ---

fn test_router(repo: Arc<InMemoryProducts>, images: Arc<FakeImages>) -> Router {
    let service = Arc::new(Service::new(repo, images));
    catalog::api::rest::routes::router(service)
}

#[tokio::test]
async fn rest_create_returns_created_with_scraped_image() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::found("https://cdn.example.com/croquettes.jpg"));
    let router = test_router(repo, images);

    let payload = serde_json::json!({
        "name": "Croquettes Vet Complex",
        "description": "Aliment complet",
        "price": 54.9,
        "category": "Alimentation",
        "subCategory": "Chien",
        "inStock": true,
        "detailsUrl": "https://shop.example.com/p/1",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["imageUrl"], "https://cdn.example.com/croquettes.jpg");
    assert_eq!(body["subCategory"], "Chien");

    Ok(())
}

#[tokio::test]
async fn rest_get_unknown_product_is_404_with_message() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::missing());
    let router = test_router(repo, images);

    let request = Request::builder()
        .uri("/99")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["error"], "Product not found with id: 99");

    Ok(())
}

#[tokio::test]
async fn rest_stock_filter_parses_path_flag() -> Result<()> {
    let repo = Arc::new(InMemoryProducts::default());
    let images = Arc::new(FakeImages::missing());
    let service = Service::new(repo.clone(), images.clone());
    service.create(croquettes(None, None)).await?;
    let router = test_router(repo, images);

    let request = Request::builder()
        .uri("/stock/true")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    Ok(())
}
