use async_trait::async_trait;

/// Best-effort image discovery on a product's details page. `None` means the
/// page was reachable but no usable image was found; errors mean the page
/// could not be fetched or parsed. Callers degrade both to a placeholder.
#[async_trait]
pub trait ProductImageLookup: Send + Sync {
    async fn lookup(&self, details_url: &str) -> anyhow::Result<Option<String>>;
}
