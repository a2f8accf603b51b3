//! National Weather Service provider (api.weather.gov).
//!
//! Forecasts take two requests: `GET /points/{lat},{lon}` resolves the grid
//! forecast URL, then that URL returns 12-hour day/night periods. Periods are
//! grouped by local calendar date into daily highs and lows.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::WeatherError;
use crate::model::{celsius_to_fahrenheit, round1, DailyForecast, ForecastRequest, ProviderId, WeatherReport};
use crate::provider::{parse_response, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

/// HTTP client for the NWS API.
pub struct NwsProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<Period>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Period {
    start_time: DateTime<FixedOffset>,
    is_daytime: bool,
    temperature: f64,
    #[serde(default = "default_unit")]
    temperature_unit: String,
    #[serde(default)]
    probability_of_precipitation: Option<Quantity>,
    #[serde(default)]
    short_forecast: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Quantity {
    value: Option<f64>,
}

fn default_unit() -> String {
    "F".to_string()
}

impl NwsProvider {
    /// `client` must already carry the `User-Agent` NWS requires.
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn forecast_url(&self, request: &ForecastRequest) -> Result<String, WeatherError> {
        let response = self
            .client
            .get(format!(
                "{}/points/{:.4},{:.4}",
                self.base_url, request.latitude, request.longitude
            ))
            .header(reqwest::header::ACCEPT, "application/geo+json")
            .send()
            .await?;

        let points: PointsResponse = parse_response(response).await?;
        points.properties.forecast.ok_or_else(|| {
            WeatherError::UnexpectedPayload("NWS points response has no forecast URL".to_string())
        })
    }
}

#[async_trait]
impl WeatherProvider for NwsProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Nws
    }

    async fn fetch(&self, request: &ForecastRequest) -> Result<WeatherReport, WeatherError> {
        let forecast_url = self.forecast_url(request).await?;

        let response = self
            .client
            .get(&forecast_url)
            .header(reqwest::header::ACCEPT, "application/geo+json")
            .send()
            .await?;
        let forecast: ForecastResponse = parse_response(response).await?;

        let days = normalize_periods(&forecast.properties.periods, request.days);
        if days.is_empty() {
            return Err(WeatherError::UnexpectedPayload(
                "NWS forecast contained no periods".to_string(),
            ));
        }

        Ok(WeatherReport {
            provider: ProviderId::Nws,
            latitude: request.latitude,
            longitude: request.longitude,
            generated_at: Utc::now(),
            days,
            fallback: false,
            error: None,
        })
    }
}

/// Collapse day/night periods into at most `limit` daily forecasts.
fn normalize_periods(periods: &[Period], limit: u8) -> Vec<DailyForecast> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Period>> = BTreeMap::new();
    for period in periods {
        by_date
            .entry(period.start_time.date_naive())
            .or_default()
            .push(period);
    }

    by_date
        .into_iter()
        .take(usize::from(limit))
        .map(|(date, periods)| {
            let temps: Vec<f64> = periods.iter().map(|p| fahrenheit(p)).collect();
            let high = temps.iter().copied().fold(f64::MIN, f64::max);
            let low = temps.iter().copied().fold(f64::MAX, f64::min);
            let chance = periods
                .iter()
                .filter_map(|p| p.probability_of_precipitation.as_ref()?.value)
                .fold(0.0, f64::max);
            let summary = periods
                .iter()
                .find(|p| p.is_daytime)
                .or_else(|| periods.first())
                .map(|p| p.short_forecast.clone())
                .unwrap_or_default();

            DailyForecast {
                date,
                high_f: round1(high),
                low_f: round1(low),
                precipitation_chance: chance.clamp(0.0, 100.0).round() as u8,
                summary,
            }
        })
        .collect()
}

fn fahrenheit(period: &Period) -> f64 {
    if period.temperature_unit.eq_ignore_ascii_case("C") {
        celsius_to_fahrenheit(period.temperature)
    } else {
        period.temperature
    }
}
