/// Failure of a weather lookup.
///
/// Only two outcomes matter to callers: the city could not be geocoded, or
/// something upstream went wrong. The latter keeps its full `anyhow` context
/// chain for logging but is never shown to end users.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City '{city_name}' not found.")]
    NotFound { city_name: String },

    #[error("upstream weather request failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

impl WeatherError {
    pub fn not_found(city_name: impl Into<String>) -> Self {
        WeatherError::NotFound { city_name: city_name.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::NotFound { .. })
    }
}
