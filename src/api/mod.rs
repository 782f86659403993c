//! HTTP routes and the mapping of errors to status codes

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    ErrorCode, PlacecastError,
    address::AddressLookupService,
    models::{AddressResult, LocationWeather},
    service::PlaceWeatherService,
};

/// Services shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub weather: PlaceWeatherService,
    pub addresses: AddressLookupService,
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PointParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddressParams {
    pub address: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

/// Error body plus the HTTP status for its code
pub struct ApiFailure(PlacecastError);

impl From<PlacecastError> for ApiFailure {
    fn from(error: PlacecastError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let status = match code {
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NoMatch => StatusCode::NOT_FOUND,
            ErrorCode::UpstreamHttp | ErrorCode::UpstreamStatus => StatusCode::BAD_GATEWAY,
            ErrorCode::Config => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!(code = %code, "Request failed: {}", self.0);
        }
        let body = ApiError {
            error: code.as_str().to_string(),
            message: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiFailure>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/weather/coordinates", get(get_weather_at))
        .route("/geocode/reverse", get(get_reverse))
        .route("/geocode/forward", get(get_forward))
        .route("/geocode/nearby", get(get_nearby))
        .with_state(state)
}

fn point(params: &PointParams) -> Result<(f64, f64), PlacecastError> {
    match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => Ok((lat, lng)),
        _ => Err(PlacecastError::invalid_input("Both lat and lng are required")),
    }
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> ApiResult<Vec<LocationWeather>> {
    let query = params.q.unwrap_or_default();
    Ok(Json(state.weather.lookup(&query).await?))
}

async fn get_weather_at(
    State(state): State<AppState>,
    Query(params): Query<PointParams>,
) -> ApiResult<Vec<LocationWeather>> {
    let (lat, lng) = point(&params)?;
    Ok(Json(state.weather.at_coordinates(lat, lng).await?))
}

async fn get_reverse(
    State(state): State<AppState>,
    Query(params): Query<PointParams>,
) -> ApiResult<AddressResult> {
    let (lat, lng) = point(&params)?;
    let result = state
        .addresses
        .reverse(lat, lng, params.lang.as_deref())
        .await?;
    Ok(Json(result))
}

async fn get_forward(
    State(state): State<AppState>,
    Query(params): Query<AddressParams>,
) -> ApiResult<AddressResult> {
    let address = params.address.unwrap_or_default();
    let result = state
        .addresses
        .forward(&address, params.lang.as_deref())
        .await?;
    Ok(Json(result))
}

async fn get_nearby(
    State(state): State<AppState>,
    Query(params): Query<PointParams>,
) -> ApiResult<AddressResult> {
    let (lat, lng) = point(&params)?;
    let result = state
        .addresses
        .nearby(lat, lng, params.lang.as_deref())
        .await?;
    Ok(Json(result))
}
