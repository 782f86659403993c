//! Address and point geocoding models

use serde::{Deserialize, Serialize};

/// Status literal the address provider uses for success
pub const STATUS_OK: &str = "OK";
/// Status literal for a well-formed request without results
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// What to geocode: a point (reverse) or a free-form address (forward)
#[derive(Debug, Clone, PartialEq)]
pub enum AddressQuery {
    Point { latitude: f64, longitude: f64 },
    Address(String),
}

/// Raw response envelope of the address provider
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<RawGeocodeResult>,
    pub error_message: Option<String>,
}

impl GeocodeResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawGeocodeResult {
    pub formatted_address: Option<String>,
    pub place_id: Option<String>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// The single address selected for a geocode call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressResult {
    pub status: String,
    pub formatted_address: Option<String>,
    pub place_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Type tags in provider order, without duplicates
    pub types: Vec<String>,
    pub address_components: Vec<AddressComponent>,
}

impl AddressResult {
    /// Normalize a ranked provider result
    #[must_use]
    pub fn from_raw(status: &str, raw: RawGeocodeResult) -> Self {
        let location = raw.geometry.map(|g| g.location);
        Self {
            status: status.to_string(),
            formatted_address: raw.formatted_address,
            place_id: raw.place_id,
            latitude: location.map(|l| l.lat),
            longitude: location.map(|l| l.lng),
            types: dedup_tags(raw.types),
            address_components: raw.address_components,
        }
    }

    /// Result carrying only a status, used when nothing usable was found
    #[must_use]
    pub fn empty(status: &str) -> Self {
        Self {
            status: status.to_string(),
            formatted_address: None,
            place_id: None,
            latitude: None,
            longitude: None,
            types: Vec::new(),
            address_components: Vec::new(),
        }
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_google_payload() {
        let payload = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "Av. Libertador Bernardo O'Higgins 1449, Santiago, Chile",
                "place_id": "ChIJ123",
                "geometry": { "location": { "lat": -33.4489, "lng": -70.6693 } },
                "types": ["street_address", "street_address"],
                "address_components": [
                    { "long_name": "1449", "short_name": "1449", "types": ["street_number"] }
                ]
            }]
        }"#;

        let response: GeocodeResponse = serde_json::from_str(payload).unwrap();
        assert!(response.is_ok());

        let raw = response.results.into_iter().next().unwrap();
        let result = AddressResult::from_raw(STATUS_OK, raw);
        assert_eq!(result.place_id.as_deref(), Some("ChIJ123"));
        assert_eq!(result.latitude, Some(-33.4489));
        assert_eq!(result.types, vec!["street_address".to_string()]);
        assert_eq!(result.address_components[0].short_name, "1449");
        assert!(result.formatted_address.is_some());
    }

    #[test]
    fn test_empty_result_keeps_status() {
        let result = AddressResult::empty(STATUS_ZERO_RESULTS);
        assert_eq!(result.status, "ZERO_RESULTS");
        assert!(result.formatted_address.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["formattedAddress"].is_null());
    }
}
