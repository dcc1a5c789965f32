use serde::{Deserialize, Serialize};
use std::env;

use crate::utils::parse_timezone;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub openweather_api_key: String,
    pub openweather_base_url: String,
    pub openweather_current_path: String,
    pub openweather_forecast_path: String,
    pub openweather_geocode_direct_path: String,
    pub openweather_lang: String,
    pub app_timezone: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Config {
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .map_err(|_| anyhow::anyhow!("OPENWEATHER_API_KEY not set"))?,
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org".to_string()),
            openweather_current_path: env::var("OPENWEATHER_CURRENT_PATH")
                .unwrap_or_else(|_| "/data/2.5/weather".to_string()),
            openweather_forecast_path: env::var("OPENWEATHER_FORECAST_PATH")
                .unwrap_or_else(|_| "/data/2.5/forecast".to_string()),
            openweather_geocode_direct_path: env::var("OPENWEATHER_GEOCODE_DIRECT_PATH")
                .unwrap_or_else(|_| "/geo/1.0/direct".to_string()),
            openweather_lang: env::var("OPENWEATHER_LANG").unwrap_or_else(|_| "kr".to_string()),
            app_timezone: env::var("APP_TIMEZONE").unwrap_or_else(|_| "Asia/Seoul".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        };

        // Fail at startup rather than on the first formatted timestamp.
        parse_timezone(&config.app_timezone).map_err(|e| anyhow::anyhow!(e))?;

        Ok(config)
    }

    pub fn timezone(&self) -> chrono_tz::Tz {
        parse_timezone(&self.app_timezone).unwrap_or(chrono_tz::Asia::Seoul)
    }

    /// Config pointed at a local mock server.
    #[cfg(test)]
    pub fn for_base_url(base_url: &str) -> Self {
        Config {
            openweather_api_key: "test-key".to_string(),
            openweather_base_url: base_url.to_string(),
            openweather_current_path: "/data/2.5/weather".to_string(),
            openweather_forecast_path: "/data/2.5/forecast".to_string(),
            openweather_geocode_direct_path: "/geo/1.0/direct".to_string(),
            openweather_lang: "kr".to_string(),
            app_timezone: "Asia/Seoul".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}
