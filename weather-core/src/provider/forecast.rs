use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use anyhow::{Context, Result, anyhow, ensure};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::{
    model::{HourlySample, HourlySeries, Location},
    transport::HttpClient,
};

/// Step assumed when the provider returns a single hourly timestamp.
const HOURLY_INTERVAL_SECS: i64 = 3600;

/// Hourly variables requested from the forecast API, in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HourlyVariable {
    Temperature2m,
    Precipitation,
    WindSpeed10m,
    Rain,
    CloudCover,
    RelativeHumidity2m,
}

impl HourlyVariable {
    pub const ALL: [HourlyVariable; 6] = [
        HourlyVariable::Temperature2m,
        HourlyVariable::Precipitation,
        HourlyVariable::WindSpeed10m,
        HourlyVariable::Rain,
        HourlyVariable::CloudCover,
        HourlyVariable::RelativeHumidity2m,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HourlyVariable::Temperature2m => "temperature_2m",
            HourlyVariable::Precipitation => "precipitation",
            HourlyVariable::WindSpeed10m => "wind_speed_10m",
            HourlyVariable::Rain => "rain",
            HourlyVariable::CloudCover => "cloud_cover",
            HourlyVariable::RelativeHumidity2m => "relative_humidity_2m",
        }
    }

    /// Comma-separated `hourly` query value.
    pub fn query_value() -> String {
        Self::ALL.iter().map(HourlyVariable::as_str).collect::<Vec<_>>().join(",")
    }
}

impl std::fmt::Display for HourlyVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open range `[start, end)` stepped by `interval`.
pub fn hourly_timestamps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: TimeDelta,
) -> Result<Vec<DateTime<Utc>>> {
    ensure!(interval > TimeDelta::zero(), "Non-positive hourly interval: {interval}");

    let mut times = Vec::new();
    let mut t = start;
    while t < end {
        times.push(t);
        t = t
            .checked_add_signed(interval)
            .ok_or_else(|| anyhow!("Hourly time range overflows at {t}"))?;
    }
    Ok(times)
}

/// Hourly block of a forecast response: time range plus values per variable.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval: TimeDelta,
    pub values: BTreeMap<HourlyVariable, Vec<Option<f64>>>,
}

impl HourlyBlock {
    fn from_raw(raw: RawHourly) -> Result<Self> {
        let RawHourly { time, mut variables } = raw;

        let (first, last) = match (time.first(), time.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(anyhow!("Forecast response contained no hourly timestamps")),
        };
        let step = match time.get(1) {
            Some(second) => second
                .checked_sub(first)
                .ok_or_else(|| anyhow!("Hourly interval overflows: {first} .. {second}"))?,
            None => HOURLY_INTERVAL_SECS,
        };
        ensure!(step > 0, "Non-positive hourly interval: {step}s");

        for pair in time.windows(2) {
            let gap = pair[1].checked_sub(pair[0]);
            ensure!(
                gap == Some(step),
                "Hourly timestamps are not evenly spaced: {} follows {} (expected step {step}s)",
                pair[1],
                pair[0]
            );
        }

        let interval = TimeDelta::try_seconds(step)
            .ok_or_else(|| anyhow!("Hourly interval out of range: {step}s"))?;
        let start = unix_to_utc(first)?;
        let end = unix_to_utc(last)?
            .checked_add_signed(interval)
            .ok_or_else(|| anyhow!("Hourly end time out of range"))?;

        let mut values = BTreeMap::new();
        for var in HourlyVariable::ALL {
            let raw_values = variables
                .remove(var.as_str())
                .ok_or_else(|| anyhow!("Forecast response is missing hourly variable '{var}'"))?;
            let parsed: Vec<Option<f64>> = serde_json::from_value(raw_values)
                .with_context(|| format!("Hourly variable '{var}' is not a numeric array"))?;
            values.insert(var, parsed);
        }

        Ok(Self { start, end, interval, values })
    }

    /// Number of steps in `[start, end)`, computed without building the range.
    fn expected_len(&self) -> Result<usize> {
        let span = (self.end - self.start).num_seconds();
        let step = self.interval.num_seconds();
        ensure!(step > 0, "Non-positive hourly interval: {step}s");
        ensure!(span >= 0, "Hourly end {} precedes start {}", self.end, self.start);

        let steps = span / step + i64::from(span % step != 0);
        usize::try_from(steps).with_context(|| format!("Hourly range too long: {steps} steps"))
    }

    pub fn timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        hourly_timestamps(self.start, self.end, self.interval)
    }

    /// Pair every timestamp with its value for each variable.
    pub fn into_series(self) -> Result<HourlySeries> {
        let expected = self.expected_len()?;
        for (var, values) in &self.values {
            ensure!(
                values.len() == expected,
                "Hourly variable '{var}' has {} values for {expected} timestamps",
                values.len()
            );
        }

        let times = self.timestamps()?;

        let value = |var: HourlyVariable, i: usize| -> Option<f64> {
            self.values.get(&var).and_then(|v| v.get(i)).copied().flatten()
        };

        let samples = times
            .into_iter()
            .enumerate()
            .map(|(i, time)| HourlySample {
                time,
                temperature: value(HourlyVariable::Temperature2m, i),
                precipitation: value(HourlyVariable::Precipitation, i),
                wind_speed: value(HourlyVariable::WindSpeed10m, i),
                rain: value(HourlyVariable::Rain, i),
                cloud_cover: value(HourlyVariable::CloudCover, i),
                relative_humidity: value(HourlyVariable::RelativeHumidity2m, i),
            })
            .collect();

        Ok(HourlySeries::new(samples))
    }
}

/// Fetches hourly forecast data for a location.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Arc<HttpClient>,
    url: String,
    model: String,
}

impl ForecastClient {
    pub fn new(http: Arc<HttpClient>, url: impl Into<String>, model: impl Into<String>) -> Self {
        Self { http, url: url.into(), model: model.into() }
    }

    pub async fn fetch_hourly(&self, location: &Location) -> Result<HourlyBlock> {
        let query = [
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("hourly", HourlyVariable::query_value()),
            ("models", self.model.clone()),
            ("timeformat", "unixtime".to_string()),
        ];

        let parsed: ForecastResponse = self.http.get_json(&self.url, &query, "forecast API").await?;

        let block = HourlyBlock::from_raw(parsed.hourly).with_context(|| {
            format!(
                "Malformed forecast for {} ({}, {})",
                location.city_name, location.latitude, location.longitude
            )
        })?;

        tracing::debug!(
            "Forecast for {}: {} .. {} every {}s",
            location.city_name,
            block.start,
            block.end,
            block.interval.num_seconds()
        );

        Ok(block)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: RawHourly,
}

#[derive(Debug, Deserialize)]
struct RawHourly {
    time: Vec<i64>,
    #[serde(flatten)]
    variables: HashMap<String, serde_json::Value>,
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| anyhow!("Timestamp out of range: {ts}"))
}
