//! Upstream provider seams
//!
//! Each upstream the pipeline talks to is a trait object so the resolver,
//! aggregator and facade can run against deterministic stubs in tests.

use async_trait::async_trait;
use serde::Deserialize;

use crate::Result;
use crate::models::{AddressQuery, GeoCandidate, GeocodeResponse, RawCandidate};

pub mod google;
pub mod open_meteo;

pub use google::GoogleGeocoder;
pub use open_meteo::OpenMeteoClient;

/// Parameters of one name-search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeSearch {
    pub name: String,
    pub country_code: Option<String>,
    pub language: String,
    pub count: u32,
}

/// Name-based geocoding (Open-Meteo `/v1/search`)
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn search(&self, request: &GeocodeSearch) -> Result<Vec<RawCandidate>>;
}

/// Address and point geocoding (Google Geocoding API)
#[async_trait]
pub trait AddressGeocoder: Send + Sync {
    async fn geocode(&self, query: &AddressQuery, language: &str) -> Result<GeocodeResponse>;
}

/// Forecast and hourly observation data for one location
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Current reading plus today's forecast extremes
    async fn forecast(&self, location: &GeoCandidate) -> Result<ForecastPayload>;

    /// Hourly temperature series for the location's current day
    async fn hourly_observations(&self, location: &GeoCandidate) -> Result<HourlySeries>;
}

/// Forecast call payload
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ForecastPayload {
    pub current: Option<CurrentConditions>,
    pub daily: Option<DailyExtremes>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CurrentConditions {
    /// Local timestamp, `YYYY-MM-DDTHH:MM`
    pub time: Option<String>,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DailyExtremes {
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
}

impl DailyExtremes {
    /// Today's forecast minimum
    #[must_use]
    pub fn today_min(&self) -> Option<f64> {
        self.temperature_2m_min.first().copied().flatten()
    }

    /// Today's forecast maximum
    #[must_use]
    pub fn today_max(&self) -> Option<f64> {
        self.temperature_2m_max.first().copied().flatten()
    }
}

/// Hourly temperature series with parallel timestamp and value arrays
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
}

/// Shared HTTP client with the per-call timeout applied
pub fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("Placecast/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| crate::PlacecastError::config(format!("Failed to create HTTP client: {e}")))
}

/// GET `url` and decode a JSON body
///
/// Transport errors, timeouts, non-2xx statuses and undecodable bodies all
/// surface as `UpstreamHttp` for `provider`.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
) -> Result<T> {
    use crate::PlacecastError;
    use std::time::Instant;

    let start_time = Instant::now();
    let response = client.get(url).send().await.map_err(|e| {
        let kind = if e.is_timeout() { "timed out" } else { "request failed" };
        tracing::warn!(provider = provider, "Upstream {kind}: {e}");
        PlacecastError::upstream_http(provider, format!("{kind}: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(provider = provider, status = %status, "Upstream returned non-success status");
        return Err(PlacecastError::upstream_http(
            provider,
            format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            ),
        ));
    }

    let body = response.json::<T>().await.map_err(|e| {
        tracing::warn!(provider = provider, "Malformed upstream payload: {e}");
        PlacecastError::upstream_http(provider, format!("malformed payload: {e}"))
    })?;

    let elapsed = start_time.elapsed();
    tracing::debug!(provider = provider, "Upstream call completed in {:.3}s", elapsed.as_secs_f64());
    if elapsed.as_secs() > 5 {
        tracing::warn!(provider = provider, "Slow upstream response: {:.3}s", elapsed.as_secs_f64());
    }

    Ok(body)
}
