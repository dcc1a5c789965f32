use super::error::WeatherError;
use super::types::*;
use super::{Geocoder, WeatherSource};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenWeatherError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("API error: {0}")]
    ApiError(String),
}

pub struct OpenWeatherClient {
    client: Client,
    config: Config,
}

impl OpenWeatherClient {
    pub fn new(config: Config) -> Result<Self, OpenWeatherError> {
        let client = Client::builder()
            .user_agent("CityWeatherServer/1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn get_current(&self, lat: f64, lon: f64) -> Result<CurrentWeatherResponse, OpenWeatherError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_current_path
        );

        self.get_weather_json(&url, lat, lon).await
    }

    pub async fn get_forecast(&self, lat: f64, lon: f64) -> Result<ForecastResponse, OpenWeatherError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_forecast_path
        );

        self.get_weather_json(&url, lat, lon).await
    }

    pub async fn geocode_direct(&self, query: &str) -> Result<Vec<GeocodeResponse>, OpenWeatherError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_geocode_direct_path
        );

        let response = self
            .make_request(&url, &[
                ("q", query),
                ("limit", "1"),
                ("appid", &self.config.openweather_api_key),
            ])
            .await?;

        let geocode: Vec<GeocodeResponse> = serde_json::from_value(response)?;
        Ok(geocode)
    }

    async fn get_weather_json<T: DeserializeOwned>(
        &self,
        url: &str,
        lat: f64,
        lon: f64,
    ) -> Result<T, OpenWeatherError> {
        let response = self
            .make_request(url, &[
                ("lat", &lat.to_string()),
                ("lon", &lon.to_string()),
                ("units", "metric"),
                ("lang", &self.config.openweather_lang),
                ("appid", &self.config.openweather_api_key),
            ])
            .await?;

        Ok(serde_json::from_value(response)?)
    }

    // Single attempt: a failed call is final for the request that made it.
    async fn make_request(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, OpenWeatherError> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if status.is_success() {
            let json: Value = response.json().await?;
            return Ok(json);
        }

        let error_text = response.text().await.unwrap_or_default();
        Err(OpenWeatherError::ApiError(format!("HTTP {}: {}", status, error_text)))
    }
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn resolve(&self, city: &str) -> Result<Coordinates, WeatherError> {
        let matches = self.geocode_direct(city).await.map_err(|e| {
            tracing::error!(city, "Direct geocoding failed: {}", e);
            WeatherError::UpstreamFetch
        })?;

        let first = matches
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::CityNotFound(city.to_string()))?;

        tracing::debug!(city, lat = first.lat, lon = first.lon, "Resolved city to {}", first.name);
        Ok(Coordinates {
            latitude: first.lat,
            longitude: first.lon,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current(&self, coords: Coordinates) -> Result<CurrentWeatherResponse, WeatherError> {
        self.get_current(coords.latitude, coords.longitude)
            .await
            .map_err(|e| {
                tracing::error!("Current weather fetch failed: {}", e);
                WeatherError::UpstreamFetch
            })
    }

    async fn fetch_forecast(&self, coords: Coordinates) -> Result<ForecastResponse, WeatherError> {
        self.get_forecast(coords.latitude, coords.longitude)
            .await
            .map_err(|e| {
                tracing::error!("Forecast fetch failed: {}", e);
                WeatherError::UpstreamFetch
            })
    }
}
