use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

// Provider payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub name: String,
    pub local_names: Option<HashMap<String, String>>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionInfo {
    pub id: i32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: Option<f64>,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindReadings {
    pub speed: f64,
    pub deg: Option<f64>,
    pub gust: Option<f64>,
}

/// Rain or snow accumulation. The provider omits the whole object when
/// nothing fell, and reports `1h` for current conditions but `3h` for
/// forecast slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hour: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSys {
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherResponse {
    pub dt: i64,
    pub name: Option<String>,
    pub timezone: Option<i32>,
    pub weather: Vec<ConditionInfo>,
    pub main: MainReadings,
    pub wind: WindReadings,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    pub sys: CurrentSys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub cod: String,
    pub cnt: i32,
    pub list: Vec<ForecastItem>,
    pub city: Option<ForecastCity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<ConditionInfo>,
    pub wind: WindReadings,
    pub pop: Option<f64>,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    pub dt_txt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    pub country: Option<String>,
    pub timezone: Option<i32>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

// Client-facing shapes

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeatherReport {
    pub weather_status: String,
    pub detail_weather_status: String,
    pub current_temp: String,
    pub apparent_temp: String,
    #[serde(rename = "currentHumi")]
    pub current_humidity: String,
    pub min_temp: String,
    pub max_temp: String,
    pub wind_speed: String,
    #[serde(rename = "rainfall")]
    pub rainfall_rate: String,
    #[serde(rename = "snowfall")]
    pub snowfall_rate: String,
    #[serde(rename = "sunrise")]
    pub sunrise_time: String,
    #[serde(rename = "sunset")]
    pub sunset_time: String,
    #[serde(rename = "icon")]
    pub icon_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    pub forecast_time: String,
    pub weather_status: String,
    pub detail_weather_status: String,
    pub current_temp: String,
    pub apparent_temp: String,
    #[serde(rename = "currentHumi")]
    pub current_humidity: String,
    pub min_temp: String,
    pub max_temp: String,
    pub wind_speed: String,
    #[serde(rename = "rainfall")]
    pub rainfall_rate: String,
    #[serde(rename = "snowfall")]
    pub snowfall_rate: String,
    #[serde(rename = "icon")]
    pub icon_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: String,
    pub entries: Vec<ForecastEntry>,
}

/// Forecast entries bucketed by calendar date.
///
/// Days keep the order in which their date was first seen, and serialize as
/// a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedForecast {
    days: Vec<ForecastDay>,
}

impl GroupedForecast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` to the bucket for `date`, opening the bucket if needed.
    pub fn push(&mut self, date: String, entry: ForecastEntry) {
        match self.days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.entries.push(entry),
            None => self.days.push(ForecastDay {
                date,
                entries: vec![entry],
            }),
        }
    }

    pub fn get(&self, date: &str) -> Option<&[ForecastEntry]> {
        self.days
            .iter()
            .find(|day| day.date == date)
            .map(|day| day.entries.as_slice())
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|day| day.date.as_str())
    }

    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.days.iter().map(|day| day.entries.len()).sum()
    }
}

impl Serialize for GroupedForecast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(&day.date, &day.entries)?;
        }
        map.end()
    }
}
