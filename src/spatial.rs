//! Nearby-point probing for reverse lookups
//!
//! When a point resolves to nothing usable, nudge it around a ring of
//! roughly 20 to 35 metres and take the first probe that yields an address.
//! This is a best-effort nearest-street heuristic, not a guaranteed match:
//! an exhausted ring is reported as an empty result, not as an error.

use tracing::{debug, info, instrument};

use crate::geocoding::GeocodingResolver;
use crate::models::address::{STATUS_OK, STATUS_ZERO_RESULTS};
use crate::models::{AddressQuery, AddressResult};
use crate::{PlacecastError, Result};

/// `(d_lat, d_lng)` offsets in degrees, in probe order
pub const PROBE_OFFSETS: [(f64, f64); 8] = [
    (0.0003, 0.0),
    (-0.0003, 0.0),
    (0.0, 0.0003),
    (0.0, -0.0003),
    (0.0002, 0.0002),
    (-0.0002, 0.0002),
    (0.0002, -0.0002),
    (-0.0002, -0.0002),
];

/// Point-based reverse geocoding with a ring of fallback probes
#[derive(Clone)]
pub struct SpatialFallbackSearch {
    resolver: GeocodingResolver,
}

impl SpatialFallbackSearch {
    pub fn new(resolver: GeocodingResolver) -> Self {
        Self { resolver }
    }

    /// Reverse geocode `(lat, lng)`, probing nearby points if needed
    ///
    /// Statuses other than `OK`/`ZERO_RESULTS` on the direct call are
    /// returned as errors without probing. Probe failures are skipped.
    #[instrument(skip(self))]
    pub async fn reverse_with_fallback(
        &self,
        latitude: f64,
        longitude: f64,
        language: &str,
    ) -> Result<AddressResult> {
        let origin = AddressQuery::Point {
            latitude,
            longitude,
        };
        let origin_status = match self.resolver.resolve_best(&origin, language).await {
            Ok(Some(best)) => return Ok(best),
            Ok(None) => STATUS_OK.to_string(),
            Err(PlacecastError::UpstreamStatus { status, .. }) if status == STATUS_ZERO_RESULTS => {
                status
            }
            Err(e) => return Err(e),
        };

        debug!("No usable result at origin ({origin_status}), probing nearby points");
        for (d_lat, d_lng) in PROBE_OFFSETS {
            let probe = AddressQuery::Point {
                latitude: latitude + d_lat,
                longitude: longitude + d_lng,
            };
            match self.resolver.resolve_best(&probe, language).await {
                Ok(Some(best)) => {
                    info!("Probe at offset ({d_lat}, {d_lng}) found an address");
                    return Ok(best);
                }
                Ok(None) => {}
                Err(e) => debug!("Probe at offset ({d_lat}, {d_lng}) failed: {e}"),
            }
        }

        info!("All {} probes exhausted", PROBE_OFFSETS.len());
        Ok(AddressResult::empty(&origin_status))
    }
}
