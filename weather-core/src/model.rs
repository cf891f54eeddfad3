use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub country_code: String,
}

/// One hourly sample. A value is `None` when the provider reported null.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySample {
    pub time: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed: Option<f64>,
    pub rain: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub relative_humidity: Option<f64>,
}

/// Hourly samples in ascending time order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    samples: Vec<HourlySample>,
}

impl HourlySeries {
    pub fn new(samples: Vec<HourlySample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent sample, used as the "current" reading.
    pub fn latest(&self) -> Option<&HourlySample> {
        self.samples.last()
    }
}

/// Response body of the weather endpoint: one sample merged with one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed: Option<f64>,
    pub rain: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub date: DateTime<Utc>,
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CurrentWeather {
    pub fn merge(sample: &HourlySample, location: &Location) -> Self {
        Self {
            temperature: sample.temperature,
            precipitation: sample.precipitation,
            wind_speed: sample.wind_speed,
            rain: sample.rain,
            cloud_cover: sample.cloud_cover,
            relative_humidity: sample.relative_humidity,
            date: sample.time,
            city: location.city_name.clone(),
            country: location.country.clone(),
            country_code: location.country_code.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}
