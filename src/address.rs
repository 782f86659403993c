//! Server-mediated reverse and forward address lookups
//!
//! Successful lookups are memoized in the shared [`GeocodeCache`]; failures
//! and misses are never cached.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::cache::{GeocodeCache, forward_key, reverse_key};
use crate::geocoding::GeocodingResolver;
use crate::models::{AddressQuery, AddressResult};
use crate::query::validate_coordinates;
use crate::spatial::SpatialFallbackSearch;
use crate::{PlacecastError, Result};

/// Reverse/forward geocoding behind the geocode cache
#[derive(Clone)]
pub struct AddressLookupService {
    resolver: GeocodingResolver,
    nearby: SpatialFallbackSearch,
    cache: Arc<GeocodeCache>,
}

impl AddressLookupService {
    pub fn new(resolver: GeocodingResolver, cache: Arc<GeocodeCache>) -> Self {
        Self {
            nearby: SpatialFallbackSearch::new(resolver.clone()),
            resolver,
            cache,
        }
    }

    /// Best address for a point
    #[instrument(skip(self))]
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
        language: Option<&str>,
    ) -> Result<AddressResult> {
        validate_coordinates(latitude, longitude)?;
        let language = language.unwrap_or(self.resolver.language());
        let key = reverse_key(latitude, longitude, language);
        let query = AddressQuery::Point {
            latitude,
            longitude,
        };
        self.cached(&key, &query, language, &format!("{latitude},{longitude}"))
            .await
    }

    /// Best match for a free-form address
    #[instrument(skip(self))]
    pub async fn forward(&self, address: &str, language: Option<&str>) -> Result<AddressResult> {
        let address = address.trim();
        if address.is_empty() {
            return Err(PlacecastError::invalid_input("Address cannot be empty"));
        }
        let language = language.unwrap_or(self.resolver.language());
        let key = forward_key(address, language);
        let query = AddressQuery::Address(address.to_string());
        self.cached(&key, &query, language, address).await
    }

    /// Point lookup that probes nearby points when the origin yields nothing
    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        language: Option<&str>,
    ) -> Result<AddressResult> {
        validate_coordinates(latitude, longitude)?;
        let language = language.unwrap_or(self.resolver.language());
        self.nearby
            .reverse_with_fallback(latitude, longitude, language)
            .await
    }

    async fn cached(
        &self,
        key: &str,
        query: &AddressQuery,
        language: &str,
        label: &str,
    ) -> Result<AddressResult> {
        if let Some(hit) = self.cache.get(key) {
            debug!("Geocode cache hit for {}", key);
            return Ok(hit);
        }

        let best = self
            .resolver
            .resolve_best(query, language)
            .await?
            .ok_or_else(|| PlacecastError::no_match(label))?;

        self.cache.set(key, best.clone());
        Ok(best)
    }
}
