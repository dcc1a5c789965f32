use super::error::WeatherError;
use super::types::*;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const PROVIDER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CLOCK_FORMAT: &str = "%H:%M";
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn format_current(payload: &CurrentWeatherResponse, tz: &Tz) -> Result<CurrentWeatherReport, WeatherError> {
    let condition = first_condition(&payload.weather)?;

    Ok(CurrentWeatherReport {
        weather_status: condition.main.clone(),
        detail_weather_status: condition.description.clone(),
        current_temp: temperature(payload.main.temp),
        apparent_temp: temperature(payload.main.feels_like),
        current_humidity: humidity(payload.main.humidity),
        min_temp: temperature(payload.main.temp_min),
        max_temp: temperature(payload.main.temp_max),
        wind_speed: wind_speed(payload.wind.speed),
        rainfall_rate: precipitation_rate(payload.rain.as_ref()),
        snowfall_rate: precipitation_rate(payload.snow.as_ref()),
        sunrise_time: clock_time(payload.sys.sunrise, tz),
        sunset_time: clock_time(payload.sys.sunset, tz),
        icon_id: condition.icon.clone(),
    })
}

pub fn format_forecast_item(item: &ForecastItem, tz: &Tz) -> Result<ForecastEntry, WeatherError> {
    let condition = first_condition(&item.weather)?;

    Ok(ForecastEntry {
        forecast_time: forecast_local_time(item, tz)
            .format(FORECAST_TIME_FORMAT)
            .to_string(),
        weather_status: condition.main.clone(),
        detail_weather_status: condition.description.clone(),
        current_temp: temperature(item.main.temp),
        apparent_temp: temperature(item.main.feels_like),
        current_humidity: humidity(item.main.humidity),
        min_temp: temperature(item.main.temp_min),
        max_temp: temperature(item.main.temp_max),
        wind_speed: wind_speed(item.wind.speed),
        rainfall_rate: precipitation_rate(item.rain.as_ref()),
        snowfall_rate: precipitation_rate(item.snow.as_ref()),
        icon_id: condition.icon.clone(),
    })
}

/// Wall-clock time of a forecast slot in `tz`.
///
/// `dt_txt` is UTC. When it does not parse, the unix `dt` is used instead.
pub fn forecast_local_time(item: &ForecastItem, tz: &Tz) -> DateTime<Tz> {
    let utc = match NaiveDateTime::parse_from_str(&item.dt_txt, PROVIDER_DATETIME_FORMAT) {
        Ok(naive) => Utc.from_utc_datetime(&naive),
        Err(_) => DateTime::from_timestamp(item.dt, 0).unwrap_or_default(),
    };
    utc.with_timezone(tz)
}

fn first_condition(conditions: &[ConditionInfo]) -> Result<&ConditionInfo, WeatherError> {
    conditions.first().ok_or(WeatherError::MalformedPayload)
}

fn temperature(celsius: f64) -> String {
    format!("{:.2}℃", celsius)
}

fn humidity(percent: f64) -> String {
    format!("{}%", percent.round() as i64)
}

fn wind_speed(ms: f64) -> String {
    format!("{:.2}m/s", ms)
}

fn precipitation_rate(precipitation: Option<&Precipitation>) -> String {
    let amount = precipitation
        .and_then(|p| p.one_hour.or(p.three_hour))
        .unwrap_or(0.0);
    format!("{}mm/h", amount)
}

fn clock_time(unix_secs: i64, tz: &Tz) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .unwrap_or_default()
        .with_timezone(tz)
        .format(CLOCK_FORMAT)
        .to_string()
}
