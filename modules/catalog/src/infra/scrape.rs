use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::domain::ports::ProductImageLookup;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Looks up a product image by fetching the details page and walking a
/// ladder of selectors, from the most specific product markup down to any
/// `<img>` at all.
pub struct HttpImageLookup {
    client: reqwest::Client,
}

impl HttpImageLookup {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProductImageLookup for HttpImageLookup {
    #[instrument(name = "catalog.scrape.lookup", skip(self))]
    async fn lookup(&self, details_url: &str) -> anyhow::Result<Option<String>> {
        let html = self
            .client
            .get(details_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(select_image_src(&html, details_url))
    }
}

// Selectors ordered from most to least specific. The first candidate that
// resolves to a .png or .jpg URL wins.
const SELECTOR_LADDER: &[&str] = &[
    "figure img",
    "img[src*='packshot'], img[class*='packshot'], img[alt*='product']",
    "img[src*='product'], .product-image img, .main-image img, img[itemprop='image']",
    "img",
];

/// Extract a usable product image URL out of a details page. Relative
/// sources are made absolute against `base_url`.
pub fn select_image_src(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    for pattern in SELECTOR_LADDER {
        let Ok(selector) = Selector::parse(pattern) else {
            continue;
        };
        for element in document.select(&selector) {
            let src = element
                .value()
                .attr("src")
                .filter(|s| !s.is_empty())
                .or_else(|| element.value().attr("data-src").filter(|s| !s.is_empty()));
            let Some(src) = src else { continue };
            let absolute = absolutize(src, base_url);
            if is_image_url(&absolute) {
                debug!("Selector '{pattern}' matched {absolute}");
                return Some(absolute);
            }
        }
    }
    None
}

fn absolutize(src: &str, base_url: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        return src.to_string();
    }
    match reqwest::Url::parse(base_url).and_then(|base| base.join(src)) {
        Ok(url) => url.to_string(),
        Err(_) => src.to_string(),
    }
}

fn is_image_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
    path.ends_with(".png") || path.ends_with(".jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://shop.example.com/products/42";

    #[test]
    fn prefers_figure_image() {
        let html = r#"
            <html><body>
              <img src="/banner.jpg">
              <figure><img src="/img/packshot-42.png"></figure>
            </body></html>"#;
        assert_eq!(
            select_image_src(html, BASE),
            Some("https://shop.example.com/img/packshot-42.png".to_string())
        );
    }

    #[test]
    fn falls_back_to_data_src() {
        let html = r#"<figure><img data-src="/lazy/photo.jpg"></figure>"#;
        assert_eq!(
            select_image_src(html, BASE),
            Some("https://shop.example.com/lazy/photo.jpg".to_string())
        );
    }

    #[test]
    fn skips_non_image_sources() {
        let html = r#"<figure><img src="/img/spinner.gif"></figure>
                      <div class="product-image"><img src="/img/real.jpg"></div>"#;
        assert_eq!(
            select_image_src(html, BASE),
            Some("https://shop.example.com/img/real.jpg".to_string())
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let html = r#"<img src="https://cdn.example.com/a/b.png">"#;
        assert_eq!(
            select_image_src(html, BASE),
            Some("https://cdn.example.com/a/b.png".to_string())
        );
    }

    #[test]
    fn none_when_no_usable_image() {
        let html = r#"<html><body><p>Pas de photo</p><img src="/x.svg"></body></html>"#;
        assert_eq!(select_image_src(html, BASE), None);
    }

    #[test]
    fn query_strings_do_not_hide_extension() {
        let html = r#"<img src="/img/pic.jpg?w=300">"#;
        assert_eq!(
            select_image_src(html, BASE),
            Some("https://shop.example.com/img/pic.jpg?w=300".to_string())
        );
    }
}
