//! OpenWeatherMap provider (5-day / 3-hour forecast).
//!
//! Three-hour slots are grouped by local date using the city's UTC offset.
//! The free forecast covers five days, so longer requests return fewer days.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::Deserialize;

use crate::error::WeatherError;
use crate::model::{round1, DailyForecast, ForecastRequest, ProviderId, WeatherReport};
use crate::provider::{parse_response, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Local hour whose slot supplies the day's summary.
const SUMMARY_HOUR: u32 = 12;

/// HTTP client for the OpenWeatherMap API.
pub struct OpenWeatherMapProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<Slot>,
    #[serde(default)]
    city: Option<City>,
}

#[derive(Debug, Deserialize)]
struct City {
    /// Offset from UTC in seconds.
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct Slot {
    dt: i64,
    main: SlotMain,
    /// Probability of precipitation, 0-1.
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    weather: Vec<SlotWeather>,
}

#[derive(Debug, Deserialize)]
struct SlotMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct SlotWeather {
    description: String,
}

impl OpenWeatherMapProvider {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL.to_string(), api_key)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeatherMap
    }

    async fn fetch(&self, request: &ForecastRequest) -> Result<WeatherReport, WeatherError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(WeatherError::MissingApiKey("openweathermap"))?;

        let response = self
            .client
            .get(format!("{}/data/2.5/forecast", self.base_url))
            .query(&[
                ("lat", request.latitude.to_string()),
                ("lon", request.longitude.to_string()),
                ("units", "imperial".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;
        let forecast: ForecastResponse = parse_response(response).await?;

        let days = normalize_slots(&forecast, request.days)?;

        Ok(WeatherReport {
            provider: ProviderId::OpenWeatherMap,
            latitude: request.latitude,
            longitude: request.longitude,
            generated_at: Utc::now(),
            days,
            fallback: false,
            error: None,
        })
    }
}

/// Fold 3-hour slots into at most `limit` daily forecasts.
fn normalize_slots(forecast: &ForecastResponse, limit: u8) -> Result<Vec<DailyForecast>, WeatherError> {
    let offset = forecast.city.as_ref().map_or(0, |c| c.timezone);

    let mut by_date: BTreeMap<NaiveDate, Vec<(u32, &Slot)>> = BTreeMap::new();
    for slot in &forecast.list {
        let local = DateTime::<Utc>::from_timestamp(slot.dt + offset, 0).ok_or_else(|| {
            WeatherError::UnexpectedPayload(format!("Invalid forecast timestamp {}", slot.dt))
        })?;
        by_date
            .entry(local.date_naive())
            .or_default()
            .push((local.hour(), slot));
    }

    if by_date.is_empty() {
        return Err(WeatherError::UnexpectedPayload(
            "OpenWeatherMap forecast contained no slots".to_string(),
        ));
    }

    Ok(by_date
        .into_iter()
        .take(usize::from(limit))
        .map(|(date, slots)| {
            let high = slots.iter().map(|(_, s)| s.main.temp_max).fold(f64::MIN, f64::max);
            let low = slots.iter().map(|(_, s)| s.main.temp_min).fold(f64::MAX, f64::min);
            let pop = slots.iter().map(|(_, s)| s.pop).fold(0.0, f64::max);
            let summary = slots
                .iter()
                .find(|(hour, _)| *hour >= SUMMARY_HOUR)
                .or_else(|| slots.first())
                .and_then(|(_, s)| s.weather.first())
                .map(|w| w.description.clone())
                .unwrap_or_default();

            DailyForecast {
                date,
                high_f: round1(high),
                low_f: round1(low),
                precipitation_chance: (pop.clamp(0.0, 1.0) * 100.0).round() as u8,
                summary,
            }
        })
        .collect())
}
