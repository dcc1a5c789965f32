use thiserror::Error;

/// Failures surfaced to callers of the weather service.
///
/// Upstream detail is logged where it happens and never carried here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Failed to fetch weather data: city not found or provider unavailable")]
    UpstreamFetch,
    #[error("Provider payload missing weather conditions")]
    MalformedPayload,
}

impl WeatherError {
    /// Stable machine-readable code for error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            WeatherError::CityNotFound(_) => "CITY_NOT_FOUND",
            WeatherError::UpstreamFetch => "UPSTREAM_FETCH_FAILED",
            WeatherError::MalformedPayload => "MALFORMED_PAYLOAD",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::CityNotFound(_))
    }
}
