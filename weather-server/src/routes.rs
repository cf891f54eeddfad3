use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use weather_core::{CurrentWeather, WeatherError, WeatherLookup};

pub const ROOT_MESSAGE: &str =
    "Weather API is running. Use /weather/?city_name=CITY_NAME to get weather data.";
pub const UPSTREAM_DETAIL: &str = "An error occurred while fetching weather data.";

pub type SharedLookup = Arc<dyn WeatherLookup>;

pub fn router(lookup: SharedLookup) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/weather/", get(weather))
        .route("/weather", get(weather))
        .layer(TraceLayer::new_for_http())
        .with_state(lookup)
}

#[derive(Debug, Serialize)]
struct RootMessage {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct Detail {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    city_name: Option<String>,
}

async fn root() -> Json<RootMessage> {
    Json(RootMessage { message: ROOT_MESSAGE })
}

async fn weather(
    State(lookup): State<SharedLookup>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<CurrentWeather>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let city_name = match query.city_name {
        Some(name) if !name.is_empty() => name,
        Some(_) => {
            return Err(ApiError::Validation("city_name must not be empty".to_string()));
        }
        None => {
            return Err(ApiError::Validation("city_name query parameter is required".to_string()));
        }
    };

    let current = lookup.current_weather(&city_name).await?;
    Ok(Json(current))
}

#[derive(Debug)]
enum ApiError {
    Validation(String),
    Lookup(WeatherError),
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        ApiError::Lookup(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Lookup(err @ WeatherError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Lookup(err @ WeatherError::Upstream(_)) => {
                tracing::error!("Weather lookup failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_DETAIL.to_string())
            }
        };

        (status, Json(Detail { detail })).into_response()
    }
}
