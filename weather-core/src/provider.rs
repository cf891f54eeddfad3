use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::WeatherError, model::CurrentWeather};

pub mod forecast;
pub mod geocoding;

pub use forecast::{ForecastClient, HourlyBlock, HourlyVariable, hourly_timestamps};
pub use geocoding::LocationResolver;

/// Anything that can answer "what is the weather in this city right now".
///
/// The HTTP layer depends on this rather than on a concrete service so that
/// it can be exercised without network access.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn current_weather(&self, city_name: &str) -> Result<CurrentWeather, WeatherError>;
}
