pub mod cache;
pub mod error;
pub mod format;
pub mod group;
pub mod openweather;
pub mod service;
pub mod types;

use async_trait::async_trait;
use error::WeatherError;
use types::{Coordinates, CurrentWeatherResponse, ForecastResponse};

/// Resolves a city name to the coordinates of its first geocoding match.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, city: &str) -> Result<Coordinates, WeatherError>;
}

/// Raw current-conditions and 3-hour forecast payloads for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_current(&self, coords: Coordinates) -> Result<CurrentWeatherResponse, WeatherError>;
    async fn fetch_forecast(&self, coords: Coordinates) -> Result<ForecastResponse, WeatherError>;
}
