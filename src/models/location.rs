//! Location models for name-based geocoding

use serde::{Deserialize, Serialize};

/// Structured form of a free-text place query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Name sent to the provider (may include the admin region)
    pub city: String,
    /// Administrative region supplied by the user, if any
    pub admin: Option<String>,
    /// ISO 3166-1 alpha-2 code, uppercased
    pub country_code: Option<String>,
}

/// A single result as returned by the name-search provider
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawCandidate {
    pub id: u64,
    pub name: String,
    pub admin1: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub population: Option<u64>,
    pub timezone: Option<String>,
}

/// A resolved place, ready for weather lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoCandidate {
    pub id: u64,
    pub name: String,
    pub admin1: Option<String>,
    pub country: String,
    pub country_code: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    pub population: Option<u64>,
    /// IANA timezone or `auto`
    pub timezone: String,
}

impl GeoCandidate {
    /// Candidate for an explicit coordinate pair, named after its coordinates
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            id: 0,
            name: format!("{latitude:.4}, {longitude:.4}"),
            admin1: None,
            country: String::new(),
            country_code: String::new(),
            latitude,
            longitude,
            population: None,
            timezone: "auto".to_string(),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl From<RawCandidate> for GeoCandidate {
    fn from(raw: RawCandidate) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            admin1: raw.admin1.filter(|a| !a.is_empty()),
            country: raw.country.unwrap_or_default(),
            country_code: raw.country_code.unwrap_or_default(),
            latitude: raw.latitude,
            longitude: raw.longitude,
            population: raw.population,
            timezone: raw
                .timezone
                .filter(|tz| !tz.is_empty())
                .unwrap_or_else(|| "auto".to_string()),
        }
    }
}
