//! Integration tests for Placecast
//!
//! The live Open-Meteo and Google clients run against a local wiremock
//! server; the HTTP surface is driven in-process through the axum router.

use std::process::Command;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use placecast::api::AppState;
use placecast::config::PlacecastConfig;
use placecast::{PlacecastError, service, web};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, api_key: Option<&str>) -> PlacecastConfig {
    let mut config = PlacecastConfig::default();
    config.providers.geocoding_url = format!("{}/v1/search", server.uri());
    config.providers.forecast_url = format!("{}/v1/forecast", server.uri());
    config.providers.observation_url = format!("{}/v1/forecast", server.uri());
    config.providers.address_url = format!("{}/maps/api/geocode/json", server.uri());
    config.providers.address_api_key = api_key.map(str::to_string);
    config.providers.timeout_seconds = 2;
    config
}

fn candidate(id: u64, name: &str, latitude: f64, population: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "admin1": "Región Metropolitana",
        "country": "Chile",
        "country_code": "CL",
        "latitude": latitude,
        "longitude": -70.5,
        "population": population,
        "timezone": "America/Santiago"
    })
}

async fn mount_weather(server: &MockServer, latitude: &str, temperature: f64) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", latitude))
        .and(query_param("daily", "temperature_2m_min,temperature_2m_max"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {
                "time": "2024-01-01T06:00",
                "temperature_2m": temperature,
                "relative_humidity_2m": 40.4,
                "wind_speed_10m": 7.5
            },
            "daily": {
                "temperature_2m_min": [8.04],
                "temperature_2m_max": [27.96]
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", latitude))
        .and(query_param("hourly", "temperature_2m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hourly": {
                "time": ["2024-01-01T00:00", "2024-01-01T06:00", "2024-01-01T12:00"],
                "temperature_2m": [10.0, 8.0, 20.0]
            }
        })))
        .mount(server)
        .await;
}

async fn mount_failing_weather(server: &MockServer, latitude: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", latitude))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_aggregates_weather_and_drops_failed_locations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Santiago"))
        .and(query_param("countryCode", "CL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                candidate(1, "Santiago", -33.45, 200_000),
                candidate(2, "Santiago", -33.5, 5_000_000),
                candidate(3, "Santiago", -33.6, 10_000)
            ]
        })))
        .mount(&server)
        .await;
    mount_weather(&server, "-33.5", 21.04).await;
    mount_failing_weather(&server, "-33.45").await;
    mount_weather(&server, "-33.6", 19.0).await;

    let (weather, _) = service::from_config(&config_for(&server, None)).unwrap();
    let results = weather.lookup("Santiago, CL").await.unwrap();

    let ids: Vec<u64> = results.iter().map(|r| r.location.id).collect();
    assert_eq!(ids, vec![2, 3]);

    let sample = &results[0].weather;
    assert_eq!(sample.current, Some(21.0));
    assert_eq!(sample.humidity, Some(40));
    assert_eq!(sample.wind, Some(8));
    assert_eq!(sample.min_observed, Some(8.0));
    assert_eq!(sample.max_observed, Some(10.0));
    assert_eq!(sample.min_forecast, Some(8.0));
    assert_eq!(sample.max_forecast, Some(28.0));
}

#[tokio::test]
async fn test_geocoding_outage_is_not_reported_as_no_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (weather, _) = service::from_config(&config_for(&server, None)).unwrap();
    let err = weather.lookup("Santiago").await.unwrap_err();
    assert!(matches!(err, PlacecastError::UpstreamHttp { .. }));
}

async fn call(config: &PlacecastConfig, uri: &str) -> (StatusCode, Value) {
    let (weather, addresses) = service::from_config(config).unwrap();
    let app = web::app(AppState { weather, addresses }, config.providers.timeout());
    send(app, uri).await
}

async fn send(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_blank_query_is_bad_request() {
    let server = MockServer::start().await;
    let (status, body) = call(&config_for(&server, None), "/api/weather?q=%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid-input");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_place_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let (status, body) = call(&config_for(&server, None), "/api/weather?q=Atlantis,%20XX").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no-match");
}

#[tokio::test]
async fn test_weather_at_coordinates_endpoint() {
    let server = MockServer::start().await;
    mount_weather(&server, "-33.4489", 12.0).await;

    let (status, body) = call(
        &config_for(&server, None),
        "/api/weather/coordinates?lat=-33.4489&lng=-70.6693",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["location"]["name"], "-33.4489, -70.6693");
    assert_eq!(body[0]["weather"]["current"], 12.0);
    assert_eq!(body[0]["weather"]["minObserved"], 8.0);
}

#[tokio::test]
async fn test_reverse_lookup_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("latlng", "-33.4489,-70.6693"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "formatted_address": "Santiago, Chile",
                    "place_id": "city",
                    "types": ["locality", "political"]
                },
                {
                    "formatted_address": "Catedral 1000, Santiago, Chile",
                    "place_id": "street",
                    "geometry": { "location": { "lat": -33.4488, "lng": -70.6692 } },
                    "types": ["street_address"]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, Some("test-key"));
    let (weather, addresses) = service::from_config(&config).unwrap();
    let app = web::app(AppState { weather, addresses }, config.providers.timeout());

    let uri = "/api/geocode/reverse?lat=-33.4489&lng=-70.6693&lang=es";
    let (status, first) = send(app.clone(), uri).await;
    let (_, second) = send(app, uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["formattedAddress"], "Catedral 1000, Santiago, Chile");
    assert_eq!(first["latitude"], -33.4488);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_forward_lookup_without_api_key_is_server_error() {
    let server = MockServer::start().await;
    let (status, body) = call(
        &config_for(&server, None),
        "/api/geocode/forward?address=Catedral%201000",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "config-error");
}

#[tokio::test]
async fn test_denied_address_lookup_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let (status, body) = call(
        &config_for(&server, Some("bad-key")),
        "/api/geocode/forward?address=Catedral%201000",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "upstream-status-error");
}

#[tokio::test]
async fn test_nearby_lookup_probes_around_empty_point() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("latlng", "-33.4489,-70.6693"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{ "formatted_address": "Nearby St 1", "types": ["route"] }]
        })))
        .mount(&server)
        .await;

    let (status, body) = call(
        &config_for(&server, Some("test-key")),
        "/api/geocode/nearby?lat=-33.4489&lng=-70.6693",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formattedAddress"], "Nearby St 1");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_coordinates_are_bad_request() {
    let server = MockServer::start().await;
    let (status, body) = call(&config_for(&server, None), "/api/geocode/reverse?lat=10").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid-input");
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_placecast"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("weather"));
    assert!(stdout.contains("reverse"));
}
