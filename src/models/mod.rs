//! Data models for Placecast
//!
//! Value objects created fresh per request:
//! - Location: parsed queries and geocoding candidates
//! - Address: raw and normalized address/point geocoding results
//! - Weather: per-location weather samples and aggregated results

pub mod address;
pub mod location;
pub mod weather;

pub use address::{AddressComponent, AddressQuery, AddressResult, GeocodeResponse, RawGeocodeResult};
pub use location::{GeoCandidate, ParsedQuery, RawCandidate};
pub use weather::{LocationWeather, WeatherSample};
