use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::Config,
    utils::ErrorResponse,
    weather::{
        error::WeatherError,
        service::WeatherService,
        types::{CurrentWeatherReport, GroupedForecast},
    },
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather_service: Arc<WeatherService>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub timezone: String,
}

/// A failed weather request, tagged with the id logged for it.
#[derive(Debug)]
pub struct ApiError {
    pub error: WeatherError,
    pub request_id: Uuid,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.error.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = ErrorResponse::new(&self.error.to_string(), self.error.code())
            .with_request_id(self.request_id.to_string());

        (status, Json(body)).into_response()
    }
}

// Route handlers
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timezone: state.config.app_timezone.clone(),
    })
}

pub async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<CurrentWeatherReport>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("get_weather", %request_id, city = %city);

    async {
        match state.weather_service.get_weather_by_city(&city).await {
            Ok(report) => Ok(Json(report)),
            Err(error) => {
                tracing::warn!("Current weather request failed: {}", error);
                Err(ApiError { error, request_id })
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn get_forecast(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<GroupedForecast>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("get_forecast", %request_id, city = %city);

    async {
        match state.weather_service.get_five_day_forecast(&city).await {
            Ok(grouped) => Ok(Json(grouped)),
            Err(error) => {
                tracing::warn!("Forecast request failed: {}", error);
                Err(ApiError { error, request_id })
            }
        }
    }
    .instrument(span)
    .await
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather/:city", get(get_weather))
        .route("/forecast/:city", get(get_forecast))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::cache::MokaStore;
    use crate::weather::openweather::OpenWeatherClient;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state_for(server: &MockServer) -> AppState {
        let config = Config::for_base_url(&server.uri());
        let client = Arc::new(OpenWeatherClient::new(config.clone()).unwrap());
        let weather_service = Arc::new(WeatherService::new(
            client.clone(),
            client,
            Arc::new(MokaStore::default()),
            config.timezone(),
        ));

        AppState {
            config: Arc::new(config),
            weather_service,
        }
    }

    #[test]
    fn test_error_status_mapping() {
        let request_id = Uuid::new_v4();

        let not_found = ApiError {
            error: WeatherError::CityNotFound("Atlantis".to_string()),
            request_id,
        };
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let upstream = ApiError {
            error: WeatherError::UpstreamFetch,
            request_id,
        };
        assert_eq!(upstream.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let malformed = ApiError {
            error: WeatherError::MalformedPayload,
            request_id,
        };
        assert_eq!(malformed.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_city_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let result = get_weather(State(state_for(&server)), Path("Atlantis".to_string())).await;
        let err = result.unwrap_err();
        assert_eq!(err.error, WeatherError::CityNotFound("Atlantis".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upstream_error_detail_is_hidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "Seoul", "lat": 37.5665, "lon": 126.978, "country": "KR" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal provider trace"))
            .mount(&server)
            .await;

        let result = get_forecast(State(state_for(&server)), Path("Seoul".to_string())).await;
        let err = result.unwrap_err();
        assert_eq!(err.error, WeatherError::UpstreamFetch);
        assert!(!err.error.to_string().contains("provider trace"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_reports_timezone() {
        let server = MockServer::start().await;
        let Json(body) = health(State(state_for(&server))).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.timezone, "Asia/Seoul");
    }
}
