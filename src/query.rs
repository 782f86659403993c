//! Query parsing
//!
//! Turns user input into either an explicit coordinate pair or a structured
//! place query (`city[, admin][, country code]`).

use crate::error::PlacecastError;
use crate::models::ParsedQuery;
use crate::Result;

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Coordinates (latitude, longitude)
    Coordinates(f64, f64),
    /// Free-text place name
    Name(String),
}

/// Location input classification
pub struct LocationParser;

impl LocationParser {
    /// Classify raw input as coordinates or a place name
    ///
    /// Blank input and numeric pairs outside the valid coordinate ranges are
    /// rejected so they never reach a provider.
    pub fn parse(input: &str) -> Result<LocationInput> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PlacecastError::invalid_input("Location cannot be empty"));
        }

        if let Some((lat, lng)) = Self::numeric_pair(input) {
            validate_coordinates(lat, lng)?;
            return Ok(LocationInput::Coordinates(lat, lng));
        }

        Ok(LocationInput::Name(input.to_string()))
    }

    /// Two numeric tokens separated by a comma and/or whitespace
    fn numeric_pair(input: &str) -> Option<(f64, f64)> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != 2 {
            return None;
        }

        let lat = parts[0].parse::<f64>().ok()?;
        let lng = parts[1].parse::<f64>().ok()?;
        Some((lat, lng))
    }
}

/// Reject coordinates outside the WGS84 ranges
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(PlacecastError::invalid_input(format!(
            "Latitude must be between -90 and 90, got: {lat}"
        )));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(PlacecastError::invalid_input(format!(
            "Longitude must be between -180 and 180, got: {lng}"
        )));
    }
    Ok(())
}

/// Split a place query into city, admin region and country code
///
/// Any two-letter alphabetic tail is taken as a country code, including
/// US state abbreviations such as `OH`. That ambiguity is intentional here
/// and left to the provider's country filter.
#[must_use]
pub fn parse_query(input: &str) -> ParsedQuery {
    let parts: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut city = parts.first().map(|p| (*p).to_string()).unwrap_or_default();
    let mut admin = None;
    let mut country_code = None;

    match parts.len() {
        0 | 1 => {}
        2 => country_code = as_country_code(parts[1]),
        n => {
            let region = parts[1].to_string();
            country_code = as_country_code(parts[n - 1]);
            city = format!("{city} {region}");
            admin = Some(region);
        }
    }

    ParsedQuery {
        city,
        admin,
        country_code,
    }
}

/// Text before the first comma, used for the looser second search pass
#[must_use]
pub fn leading_segment(input: &str) -> &str {
    input.split(',').next().unwrap_or_default().trim()
}

fn as_country_code(segment: &str) -> Option<String> {
    (segment.len() == 2 && segment.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| segment.to_ascii_uppercase())
}
