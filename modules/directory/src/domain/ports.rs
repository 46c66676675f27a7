use async_trait::async_trait;

use crate::contract::model::Coordinates;

/// External geocoder: free-text query to a coordinate, best match only.
/// `None` means the service answered but found nothing.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Coordinates>>;
}
