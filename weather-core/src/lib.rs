//! Core library for the weather HTTP service.
//!
//! This crate defines:
//! - Configuration loading
//! - Outbound transport with response caching and retry
//! - Open-Meteo geocoding and hourly forecast clients
//! - The lookup service reducing a forecast to its latest hour
//!
//! It is used by `weather-server`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod transport;

pub use config::Config;
pub use error::WeatherError;
pub use model::{CurrentWeather, HourlySample, HourlySeries, Location};
pub use provider::WeatherLookup;
pub use service::WeatherService;
