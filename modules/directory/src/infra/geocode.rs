//! Nominatim-backed implementation of the [`Geocoder`] port.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::contract::model::Coordinates;
use crate::domain::ports::Geocoder;
use runtime::GeocoderConfig;

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn from_config(cfg: &GeocoderConfig) -> Result<Self> {
        // Nominatim's usage policy requires an identifying User-Agent.
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("Failed to build geocoder HTTP client")?;
        Ok(Self {
            client,
            // The configured URL is the full search endpoint.
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
        let hits: Vec<NominatimHit> = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .with_context(|| format!("Geocoding request for '{query}' failed"))?
            .error_for_status()
            .context("Geocoder returned an error status")?
            .json()
            .await
            .context("Geocoder returned malformed JSON")?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };
        let latitude = hit
            .lat
            .parse()
            .with_context(|| format!("Bad latitude '{}'", hit.lat))?;
        let longitude = hit
            .lon
            .parse()
            .with_context(|| format!("Bad longitude '{}'", hit.lon))?;
        Ok(Some(Coordinates {
            latitude,
            longitude,
        }))
    }
}
