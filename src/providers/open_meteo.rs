//! Open-Meteo client for name search, forecasts and hourly series

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{
    CandidateSource, ForecastPayload, ForecastSource, GeocodeSearch, HourlySeries, get_json,
};
use crate::Result;
use crate::config::ProvidersConfig;
use crate::models::{GeoCandidate, RawCandidate};

const PROVIDER: &str = "open-meteo";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_min,temperature_2m_max";
const HOURLY_FIELDS: &str = "temperature_2m";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<RawCandidate>>,
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    hourly: Option<HourlySeries>,
}

/// Open-Meteo geocoding, forecast and hourly endpoints
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
    observation_url: String,
}

impl OpenMeteoClient {
    pub fn new(client: reqwest::Client, config: &ProvidersConfig) -> Self {
        Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            observation_url: config.observation_url.clone(),
        }
    }

    fn search_url(&self, request: &GeocodeSearch) -> String {
        let mut url = format!(
            "{}?name={}&count={}&language={}&format=json",
            self.geocoding_url,
            urlencoding::encode(&request.name),
            request.count,
            urlencoding::encode(&request.language),
        );
        if let Some(cc) = &request.country_code {
            url.push_str(&format!("&countryCode={}", urlencoding::encode(cc)));
        }
        url
    }

    fn forecast_request_url(&self, location: &GeoCandidate) -> String {
        format!(
            "{}?latitude={}&longitude={}&timezone={}&current={CURRENT_FIELDS}&daily={DAILY_FIELDS}&forecast_days=1",
            self.forecast_url,
            location.latitude,
            location.longitude,
            urlencoding::encode(&location.timezone),
        )
    }

    fn observation_request_url(&self, location: &GeoCandidate) -> String {
        format!(
            "{}?latitude={}&longitude={}&timezone={}&hourly={HOURLY_FIELDS}&forecast_days=1",
            self.observation_url,
            location.latitude,
            location.longitude,
            urlencoding::encode(&location.timezone),
        )
    }
}

#[async_trait]
impl CandidateSource for OpenMeteoClient {
    #[instrument(skip(self), fields(name = %request.name))]
    async fn search(&self, request: &GeocodeSearch) -> Result<Vec<RawCandidate>> {
        let url = self.search_url(request);
        debug!("Open-Meteo geocoding request: {}", url);

        let response: SearchResponse = get_json(&self.client, PROVIDER, &url).await?;
        let results = response.results.unwrap_or_default();
        debug!("Open-Meteo returned {} candidates", results.len());
        Ok(results)
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    #[instrument(skip(self, location), fields(location = %location.name))]
    async fn forecast(&self, location: &GeoCandidate) -> Result<ForecastPayload> {
        let url = self.forecast_request_url(location);
        debug!("Open-Meteo forecast request: {}", url);
        get_json(&self.client, PROVIDER, &url).await
    }

    #[instrument(skip(self, location), fields(location = %location.name))]
    async fn hourly_observations(&self, location: &GeoCandidate) -> Result<HourlySeries> {
        let url = self.observation_request_url(location);
        debug!("Open-Meteo hourly request: {}", url);
        let response: HourlyResponse = get_json(&self.client, PROVIDER, &url).await?;
        Ok(response.hourly.unwrap_or_default())
    }
}
