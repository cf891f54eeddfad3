use std::sync::Arc;

use serde::Deserialize;

use crate::{error::WeatherError, model::Location, transport::HttpClient};

/// Resolves a free-text city name to its best-match location.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    http: Arc<HttpClient>,
    url: String,
}

impl LocationResolver {
    pub fn new(http: Arc<HttpClient>, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    /// The name is sent as given; no trimming or case folding.
    pub async fn resolve(&self, city_name: &str) -> Result<Location, WeatherError> {
        let query = [
            ("name", city_name.to_string()),
            ("count", "1".to_string()),
            ("format", "json".to_string()),
        ];

        let parsed: GeocodingResponse =
            self.http.get_json(&self.url, &query, "geocoding API").await?;

        let Some(first) = parsed.results.into_iter().next() else {
            tracing::info!("No geocoding match for '{}'", city_name);
            return Err(WeatherError::not_found(city_name));
        };

        tracing::debug!(
            "Resolved '{}' to {} ({}, {})",
            city_name,
            first.name,
            first.latitude,
            first.longitude
        );

        Ok(Location {
            city_name: first.name,
            latitude: first.latitude,
            longitude: first.longitude,
            country: first.country,
            country_code: first.country_code,
        })
    }
}

/// Open-Meteo omits `results` entirely when nothing matches.
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: String,
    country_code: String,
}
