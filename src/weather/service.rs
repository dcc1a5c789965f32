use super::cache::{CacheAside, CacheKey, CacheStore, CACHE_TTL};
use super::error::WeatherError;
use super::format::format_current;
use super::group::group_by_date;
use super::types::{CurrentWeatherReport, GroupedForecast};
use super::{Geocoder, WeatherSource};
use chrono_tz::Tz;
use std::sync::Arc;

/// The two public read paths: current conditions and the 5-day forecast
/// for a city, each behind the cache.
pub struct WeatherService {
    geocoder: Arc<dyn Geocoder>,
    source: Arc<dyn WeatherSource>,
    cache: CacheAside,
    timezone: Tz,
}

impl WeatherService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        source: Arc<dyn WeatherSource>,
        store: Arc<dyn CacheStore>,
        timezone: Tz,
    ) -> Self {
        Self {
            geocoder,
            source,
            cache: CacheAside::new(store),
            timezone,
        }
    }

    pub async fn get_weather_by_city(&self, city: &str) -> Result<CurrentWeatherReport, WeatherError> {
        let key = CacheKey::Weather(city).to_string();

        self.cache
            .get_or_compute(&key, CACHE_TTL, || async {
                let coords = self.geocoder.resolve(city).await?;
                let payload = self.source.fetch_current(coords).await?;
                format_current(&payload, &self.timezone)
            })
            .await
    }

    pub async fn get_five_day_forecast(&self, city: &str) -> Result<GroupedForecast, WeatherError> {
        let key = CacheKey::Forecast(city).to_string();

        self.cache
            .get_or_compute(&key, CACHE_TTL, || async {
                let coords = self.geocoder.resolve(city).await?;
                let payload = self.source.fetch_forecast(coords).await?;
                group_by_date(&payload.list, &self.timezone)
            })
            .await
    }
}
