//! Google Geocoding API client for address and point lookups

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{AddressGeocoder, get_json};
use crate::config::ProvidersConfig;
use crate::models::{AddressQuery, GeocodeResponse};
use crate::{PlacecastError, Result};

const PROVIDER: &str = "google-geocoding";

/// Address/point geocoder backed by the Google Geocoding JSON API
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(client: reqwest::Client, config: &ProvidersConfig) -> Self {
        Self {
            client,
            base_url: config.address_url.clone(),
            api_key: config.address_api_key.clone(),
        }
    }

    fn query_string(query: &AddressQuery, language: &str) -> String {
        let target = match query {
            AddressQuery::Point {
                latitude,
                longitude,
            } => format!("latlng={latitude},{longitude}"),
            AddressQuery::Address(address) => {
                format!("address={}", urlencoding::encode(address))
            }
        };
        format!("{target}&language={}", urlencoding::encode(language))
    }
}

#[async_trait]
impl AddressGeocoder for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &AddressQuery, language: &str) -> Result<GeocodeResponse> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            PlacecastError::config("providers.address_api_key is required for address geocoding")
        })?;

        let query_string = Self::query_string(query, language);
        debug!("Google geocoding request: {}?{}", self.base_url, query_string);

        let url = format!(
            "{}?{}&key={}",
            self.base_url,
            query_string,
            urlencoding::encode(key)
        );
        let response: GeocodeResponse = get_json(&self.client, PROVIDER, &url).await?;
        debug!(
            "Google geocoding status {} with {} results",
            response.status,
            response.results.len()
        );
        Ok(response)
    }
}
