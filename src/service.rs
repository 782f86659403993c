//! Place-to-weather facade
//!
//! The single entry point for callers: resolve a query (or take explicit
//! coordinates) and fetch weather for every plausible match.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::address::AddressLookupService;
use crate::cache::GeocodeCache;
use crate::config::PlacecastConfig;
use crate::geocoding::GeocodingResolver;
use crate::models::{GeoCandidate, LocationWeather};
use crate::providers::{GoogleGeocoder, OpenMeteoClient, http_client};
use crate::query::{LocationInput, LocationParser, validate_coordinates};
use crate::weather::WeatherAggregator;
use crate::{PlacecastError, Result};

/// Resolves places and aggregates their weather
#[derive(Clone)]
pub struct PlaceWeatherService {
    resolver: GeocodingResolver,
    aggregator: WeatherAggregator,
}

impl PlaceWeatherService {
    pub fn new(resolver: GeocodingResolver, aggregator: WeatherAggregator) -> Self {
        Self {
            resolver,
            aggregator,
        }
    }

    /// Weather for every match of a free-text place query
    ///
    /// An empty list means candidates were found but none produced weather.
    /// Zero candidates is a `NoMatch` error, and a provider failure during
    /// resolution surfaces as an upstream error rather than as no match.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<LocationWeather>> {
        let candidates = self.resolver.try_resolve_many(query).await?;
        if candidates.is_empty() {
            return Err(PlacecastError::no_match(query.trim()));
        }

        let results = self.aggregator.for_locations(&candidates).await;
        info!(
            "Query '{}' resolved to {} candidates, {} with weather",
            query.trim(),
            candidates.len(),
            results.len()
        );
        Ok(results)
    }

    /// Weather at an explicit point
    ///
    /// There is a single location, so failing to get any weather for it is
    /// reported as an upstream error instead of an empty list.
    #[instrument(skip(self))]
    pub async fn at_coordinates(&self, latitude: f64, longitude: f64) -> Result<Vec<LocationWeather>> {
        validate_coordinates(latitude, longitude)?;

        let location = GeoCandidate::from_coordinates(latitude, longitude);
        let weather = self
            .aggregator
            .for_location(&location)
            .await
            .ok_or_else(|| {
                PlacecastError::upstream_http(
                    "forecast",
                    format!("no weather data for {}", location.format_coordinates()),
                )
            })?;

        Ok(vec![LocationWeather { location, weather }])
    }

    /// Dispatch raw input to [`at_coordinates`](Self::at_coordinates) or
    /// [`search`](Self::search)
    pub async fn lookup(&self, input: &str) -> Result<Vec<LocationWeather>> {
        match LocationParser::parse(input)? {
            LocationInput::Coordinates(lat, lng) => self.at_coordinates(lat, lng).await,
            LocationInput::Name(name) => self.search(&name).await,
        }
    }
}

/// Both services wired against the configured live providers
pub fn from_config(config: &PlacecastConfig) -> Result<(PlaceWeatherService, AddressLookupService)> {
    let client = http_client(config.providers.timeout())?;
    let open_meteo = Arc::new(OpenMeteoClient::new(client.clone(), &config.providers));
    let google = Arc::new(GoogleGeocoder::new(client, &config.providers));

    let resolver = GeocodingResolver::new(
        open_meteo.clone(),
        google,
        config.providers.language.clone(),
        config.providers.result_cap,
    );
    let cache = Arc::new(GeocodeCache::new(config.cache.ttl()));

    Ok((
        PlaceWeatherService::new(resolver.clone(), WeatherAggregator::new(open_meteo)),
        AddressLookupService::new(resolver, cache),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressQuery, GeocodeResponse, RawCandidate};
    use crate::providers::{
        AddressGeocoder, CandidateSource, CurrentConditions, ForecastPayload, ForecastSource,
        GeocodeSearch, HourlySeries,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Candidates(Result<Vec<RawCandidate>>);

    #[async_trait]
    impl CandidateSource for Candidates {
        async fn search(&self, _request: &GeocodeSearch) -> Result<Vec<RawCandidate>> {
            self.0.clone()
        }
    }

    struct NoAddresses;

    #[async_trait]
    impl AddressGeocoder for NoAddresses {
        async fn geocode(&self, _query: &AddressQuery, _language: &str) -> Result<GeocodeResponse> {
            Ok(GeocodeResponse::default())
        }
    }

    /// Fixed reading, recording the locations asked for
    #[derive(Default)]
    struct Weather {
        fail: bool,
        asked: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ForecastSource for Weather {
        async fn forecast(&self, location: &GeoCandidate) -> Result<ForecastPayload> {
            self.asked.lock().unwrap().push(location.name.clone());
            if self.fail {
                return Err(PlacecastError::upstream_http("stub", "HTTP 502"));
            }
            Ok(ForecastPayload {
                current: Some(CurrentConditions {
                    temperature_2m: Some(18.26),
                    ..CurrentConditions::default()
                }),
                daily: None,
            })
        }

        async fn hourly_observations(&self, _location: &GeoCandidate) -> Result<HourlySeries> {
            if self.fail {
                return Err(PlacecastError::upstream_http("stub", "HTTP 502"));
            }
            Ok(HourlySeries::default())
        }
    }

    fn raw(id: u64, name: &str) -> RawCandidate {
        RawCandidate {
            id,
            name: name.to_string(),
            admin1: None,
            country: Some("Chile".to_string()),
            country_code: Some("CL".to_string()),
            latitude: -33.0,
            longitude: -70.0,
            population: Some(1000 - id),
            timezone: None,
        }
    }

    fn service(candidates: Result<Vec<RawCandidate>>, weather: Arc<Weather>) -> PlaceWeatherService {
        PlaceWeatherService::new(
            GeocodingResolver::new(Arc::new(Candidates(candidates)), Arc::new(NoAddresses), "es", 10),
            WeatherAggregator::new(weather),
        )
    }

    #[tokio::test]
    async fn test_search_returns_ranked_weather() {
        let weather = Arc::new(Weather::default());
        let service = service(Ok(vec![raw(2, "Talca"), raw(1, "Santiago")]), weather);

        let results = service.search("Santiago").await.unwrap();
        let names: Vec<_> = results.iter().map(|r| r.location.name.as_str()).collect();
        assert_eq!(names, vec!["Santiago", "Talca"]);
        assert_eq!(results[0].weather.current, Some(18.3));
    }

    #[tokio::test]
    async fn test_search_without_candidates_is_no_match() {
        let service = service(Ok(Vec::new()), Arc::new(Weather::default()));
        let err = service.search("Atlantis").await.unwrap_err();
        assert!(matches!(err, PlacecastError::NoMatch { .. }));
    }

    #[tokio::test]
    async fn test_search_keeps_upstream_failure_distinct() {
        let service = service(
            Err(PlacecastError::upstream_http("open-meteo", "timed out")),
            Arc::new(Weather::default()),
        );
        let err = service.search("Santiago").await.unwrap_err();
        assert!(err.code().is_upstream());
    }

    #[tokio::test]
    async fn test_lookup_coordinates_skip_geocoding() {
        let weather = Arc::new(Weather::default());
        let service = service(
            Err(PlacecastError::upstream_http("open-meteo", "should not be called")),
            weather.clone(),
        );

        let results = service.lookup("-33.4489, -70.6693").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].location.name, "-33.4489, -70.6693");
        assert_eq!(*weather.asked.lock().unwrap(), vec!["-33.4489, -70.6693"]);
    }

    #[tokio::test]
    async fn test_lookup_rejects_blank_input_before_any_call() {
        let weather = Arc::new(Weather::default());
        let service = service(Ok(vec![raw(1, "Santiago")]), weather.clone());

        let err = service.lookup("   ").await.unwrap_err();
        assert!(matches!(err, PlacecastError::InvalidInput { .. }));
        assert!(weather.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_coordinates_without_weather_is_upstream_error() {
        let weather = Arc::new(Weather {
            fail: true,
            ..Weather::default()
        });
        let service = service(Ok(Vec::new()), weather);
        let err = service.at_coordinates(10.0, 10.0).await.unwrap_err();
        assert!(err.code().is_upstream());
    }
}
