//! Weather sample models

use serde::{Deserialize, Serialize};

use super::GeoCandidate;

/// Weather for one location, rounded for display
///
/// A `None` field means the provider omitted it, not that retrieval failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    /// Current temperature in Celsius, one decimal
    pub current: Option<f64>,
    /// Relative humidity in percent
    pub humidity: Option<i64>,
    /// Wind speed in km/h
    pub wind: Option<i64>,
    pub min_observed: Option<f64>,
    pub max_observed: Option<f64>,
    pub min_forecast: Option<f64>,
    pub max_forecast: Option<f64>,
}

impl WeatherSample {
    /// True when no field carries data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One entry of an aggregated result list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationWeather {
    pub location: GeoCandidate,
    pub weather: WeatherSample,
}
