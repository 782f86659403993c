//! Weather aggregation over resolved locations
//!
//! Each location gets a forecast call and an hourly observation call, issued
//! concurrently. A location is dropped from the result when either call
//! fails or both yield no data; the rest keep their input order.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::models::{GeoCandidate, LocationWeather, WeatherSample};
use crate::providers::{ForecastPayload, ForecastSource, HourlySeries};

/// Fan-out weather retrieval with per-location failure isolation
#[derive(Clone)]
pub struct WeatherAggregator {
    source: Arc<dyn ForecastSource>,
}

impl WeatherAggregator {
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Weather for every location that produced data, in input order
    #[instrument(skip_all, fields(locations = locations.len()))]
    pub async fn for_locations(&self, locations: &[GeoCandidate]) -> Vec<LocationWeather> {
        let samples = join_all(locations.iter().map(|location| self.for_location(location))).await;

        let results: Vec<LocationWeather> = locations
            .iter()
            .zip(samples)
            .filter_map(|(location, sample)| {
                sample.map(|weather| LocationWeather {
                    location: location.clone(),
                    weather,
                })
            })
            .collect();

        info!(
            "Weather available for {}/{} locations",
            results.len(),
            locations.len()
        );
        results
    }

    /// Sample for one location
    ///
    /// The two calls form one unit: if either fails the location has no
    /// sample. `None` is also returned when both succeed without any data.
    pub async fn for_location(&self, location: &GeoCandidate) -> Option<WeatherSample> {
        let (forecast, hourly) = futures::join!(
            self.source.forecast(location),
            self.source.hourly_observations(location)
        );

        let (forecast, hourly) = match (forecast, hourly) {
            (Ok(forecast), Ok(hourly)) => (forecast, hourly),
            (Err(e), _) => {
                warn!("Forecast for {} failed: {}", location.name, e);
                return None;
            }
            (_, Err(e)) => {
                warn!("Hourly observations for {} failed: {}", location.name, e);
                return None;
            }
        };

        let sample = build_sample(&forecast, &hourly);
        if sample.is_empty() {
            debug!("No weather data for {}, dropping", location.name);
            return None;
        }
        Some(sample)
    }
}

/// Observed minimum and maximum for today up to `current_time`
///
/// Today is the date portion of `current_time`, or the whole series when no
/// current time is known. The cutoff is the index whose timestamp equals
/// `current_time`, else the last index of today. Missing readings are
/// skipped; mismatched array lengths yield no extremes.
#[must_use]
pub fn observed_extremes(
    times: &[String],
    temperatures: &[Option<f64>],
    current_time: Option<&str>,
) -> (Option<f64>, Option<f64>) {
    if times.is_empty() || times.len() != temperatures.len() {
        return (None, None);
    }

    let current_date = current_time.map(date_part);
    let today: Vec<usize> = times
        .iter()
        .enumerate()
        .filter(|(_, t)| current_date.is_none_or(|date| date_part(t) == date))
        .map(|(i, _)| i)
        .collect();

    let Some(&last_today) = today.last() else {
        return (None, None);
    };
    let cutoff = current_time
        .and_then(|now| times.iter().position(|t| t == now))
        .unwrap_or(last_today);

    today
        .iter()
        .filter(|&&i| i <= cutoff)
        .filter_map(|&i| temperatures[i])
        .fold((None, None), |(min, max): (Option<f64>, Option<f64>), t| {
            (
                Some(min.map_or(t, |m| m.min(t))),
                Some(max.map_or(t, |m| m.max(t))),
            )
        })
}

/// Combine both payloads into a rounded sample
///
/// The current temperature falls back to the midpoint of the observed
/// extremes when the forecast carries no current reading.
#[must_use]
pub fn build_sample(forecast: &ForecastPayload, hourly: &HourlySeries) -> WeatherSample {
    let current = forecast.current.as_ref();
    let daily = forecast.daily.as_ref();
    let current_time = current.and_then(|c| c.time.as_deref());

    let (min_observed, max_observed) =
        observed_extremes(&hourly.time, &hourly.temperature_2m, current_time);

    let temperature = current.and_then(|c| c.temperature_2m).or(match (min_observed, max_observed) {
        (Some(min), Some(max)) => Some((min + max) / 2.0),
        _ => None,
    });

    WeatherSample {
        current: temperature.map(round_tenth),
        humidity: current.and_then(|c| c.relative_humidity_2m).map(round_whole),
        wind: current.and_then(|c| c.wind_speed_10m).map(round_whole),
        min_observed: min_observed.map(round_tenth),
        max_observed: max_observed.map(round_tenth),
        min_forecast: daily.and_then(|d| d.today_min()).map(round_tenth),
        max_forecast: daily.and_then(|d| d.today_max()).map(round_tenth),
    }
}

fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_whole(value: f64) -> i64 {
    value.round() as i64
}
