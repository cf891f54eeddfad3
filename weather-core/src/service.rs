use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::{
    config::Config,
    error::WeatherError,
    model::CurrentWeather,
    provider::{ForecastClient, LocationResolver, WeatherLookup},
    transport::HttpClient,
};

/// Geocode a city, fetch its hourly forecast, and report the latest hour.
///
/// Built once at startup and shared; it holds configuration and the
/// transport only.
#[derive(Debug)]
pub struct WeatherService {
    resolver: LocationResolver,
    forecast: ForecastClient,
}

impl WeatherService {
    pub fn new(resolver: LocationResolver, forecast: ForecastClient) -> Self {
        Self { resolver, forecast }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Arc::new(HttpClient::new(&config.http)?);
        let endpoints = &config.open_meteo;

        Ok(Self::new(
            LocationResolver::new(Arc::clone(&http), endpoints.geocoding_url.clone()),
            ForecastClient::new(http, endpoints.forecast_url.clone(), endpoints.model.clone()),
        ))
    }

    pub async fn current_weather(&self, city_name: &str) -> Result<CurrentWeather, WeatherError> {
        let location = self.resolver.resolve(city_name).await?;

        let series = self.forecast.fetch_hourly(&location).await?.into_series()?;
        let latest = series.latest().ok_or_else(|| {
            anyhow!("Forecast for {} contained no hourly samples", location.city_name)
        })?;

        tracing::info!(
            "Current weather for '{}': {} ({} samples)",
            city_name,
            latest.time,
            series.len()
        );

        Ok(CurrentWeather::merge(latest, &location))
    }
}

#[async_trait]
impl WeatherLookup for WeatherService {
    async fn current_weather(&self, city_name: &str) -> Result<CurrentWeather, WeatherError> {
        WeatherService::current_weather(self, city_name).await
    }
}
