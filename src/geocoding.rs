//! Geocoding resolution
//!
//! Name queries go through a two-pass search (structured, then the text
//! before the first comma), an optional admin-region filter and a
//! population ordering. A failed structured pass falls through to the
//! second pass; only a failure there is reported. Address and point lookups go through the address
//! provider and the specificity ranker.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::models::{AddressQuery, AddressResult, GeoCandidate};
use crate::providers::{AddressGeocoder, CandidateSource, GeocodeSearch};
use crate::query::{leading_segment, parse_query};
use crate::ranking::{filter_by_admin, pick_best, sort_by_population};
use crate::{PlacecastError, Result};

/// Resolves free text and addresses into ranked geographic results
#[derive(Clone)]
pub struct GeocodingResolver {
    candidates: Arc<dyn CandidateSource>,
    addresses: Arc<dyn AddressGeocoder>,
    language: String,
    result_cap: u32,
}

impl GeocodingResolver {
    pub fn new(
        candidates: Arc<dyn CandidateSource>,
        addresses: Arc<dyn AddressGeocoder>,
        language: impl Into<String>,
        result_cap: u32,
    ) -> Self {
        Self {
            candidates,
            addresses,
            language: language.into(),
            result_cap,
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Ranked candidates for `query`; provider failures yield an empty list
    pub async fn resolve_many(&self, query: &str) -> Vec<GeoCandidate> {
        match self.try_resolve_many(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Geocoding '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }

    /// Like [`resolve_many`](Self::resolve_many) but keeps provider failures
    /// distinguishable from an empty answer
    #[instrument(skip(self))]
    pub async fn try_resolve_many(&self, query: &str) -> Result<Vec<GeoCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlacecastError::invalid_input("Location cannot be empty"));
        }

        let parsed = parse_query(query);
        let structured = GeocodeSearch {
            name: parsed.city.clone(),
            country_code: parsed.country_code.clone(),
            language: self.language.clone(),
            count: self.result_cap,
        };
        let mut raw = match self.candidates.search(&structured).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Structured search for '{}' failed: {}", structured.name, e);
                Vec::new()
            }
        };

        if raw.is_empty() {
            let simple = leading_segment(query);
            debug!("No results for structured query, retrying with '{}'", simple);
            let loose = GeocodeSearch {
                name: simple.to_string(),
                country_code: None,
                language: self.language.clone(),
                count: self.result_cap,
            };
            raw = self.candidates.search(&loose).await?;
        }

        let mut candidates: Vec<GeoCandidate> = raw.into_iter().map(GeoCandidate::from).collect();

        if let Some(admin) = parsed.admin.as_deref() {
            candidates = filter_by_admin(candidates, admin);
        }

        sort_by_population(&mut candidates);
        candidates.truncate(self.result_cap as usize);

        info!("Resolved '{}' to {} candidates", query, candidates.len());
        Ok(candidates)
    }

    /// Single most specific address for an address or point query
    ///
    /// Any provider status other than `OK` is returned as an
    /// `UpstreamStatus` error, never as a miss.
    #[instrument(skip(self))]
    pub async fn resolve_best(
        &self,
        query: &AddressQuery,
        language: &str,
    ) -> Result<Option<AddressResult>> {
        let response = self.addresses.geocode(query, language).await?;
        if !response.is_ok() {
            warn!(
                "Address provider returned status {} ({})",
                response.status,
                response.error_message.as_deref().unwrap_or("no message")
            );
            return Err(PlacecastError::upstream_status(
                response.status,
                response.error_message,
            ));
        }

        let best = pick_best(&response.results)
            .cloned()
            .map(|raw| AddressResult::from_raw(&response.status, raw));
        debug!(
            "Selected {:?} out of {} results",
            best.as_ref().and_then(|b| b.formatted_address.as_deref()),
            response.results.len()
        );
        Ok(best)
    }
}
