//! `Placecast` - place search with aggregated current and observed weather
//!
//! Resolves free-text place names or raw coordinates into ranked locations,
//! fetches weather for each in parallel and computes today's observed
//! temperature extremes. Address lookups are ranked by specificity and
//! memoized for a short time.

pub mod address;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod providers;
pub mod query;
pub mod ranking;
pub mod service;
pub mod spatial;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use address::AddressLookupService;
pub use cache::GeocodeCache;
pub use config::PlacecastConfig;
pub use error::{ErrorCode, PlacecastError};
pub use geocoding::GeocodingResolver;
pub use models::{AddressResult, GeoCandidate, LocationWeather, WeatherSample};
pub use query::{LocationInput, LocationParser};
pub use service::PlaceWeatherService;
pub use spatial::SpatialFallbackSearch;
pub use weather::WeatherAggregator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlacecastError>;
