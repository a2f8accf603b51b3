//! Normalized weather types shared by every provider.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Upstream weather data source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// US National Weather Service.
    #[default]
    Nws,
    OpenWeatherMap,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::Nws, ProviderId::OpenWeatherMap];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nws => "nws",
            Self::OpenWeatherMap => "openweathermap",
        }
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nws" => Ok(Self::Nws),
            "openweathermap" | "owm" => Ok(Self::OpenWeatherMap),
            other => Err(format!(
                "Unknown weather provider '{other}'. Must be one of: nws, openweathermap"
            )),
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated forecast request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub days: u8,
}

impl ForecastRequest {
    /// Cache key: provider, coordinates rounded to 2 decimals (~1 km), days.
    pub fn cache_key(&self, provider: ProviderId) -> String {
        format!(
            "{provider}:{:.2}:{:.2}:{}",
            self.latitude, self.longitude, self.days
        )
    }
}

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high_f: f64,
    pub low_f: f64,
    /// Chance of precipitation, 0-100.
    pub precipitation_chance: u8,
    pub summary: String,
}

/// The normalized envelope returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub provider: ProviderId,
    pub latitude: f64,
    pub longitude: f64,
    pub generated_at: DateTime<Utc>,
    pub days: Vec<DailyForecast>,
    /// `true` when the days are synthetic climatology, not a live forecast.
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Convert Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
