//! Seasonal climatology used when no live forecast is available.
//!
//! A crude sinusoidal model: the annual mean cools and the seasonal swing
//! widens with distance from the equator, with the warmest day in mid-July
//! (northern) or mid-January (southern).

use std::f64::consts::PI;

use chrono::{Datelike, Days, NaiveDate, Utc};

use crate::model::{round1, DailyForecast, ForecastRequest, ProviderId, WeatherReport};

/// Day of year of the northern temperature peak.
const NORTHERN_PEAK_DAY: f64 = 196.0;

/// Half the typical day/night spread, °F.
const DIURNAL_HALF_RANGE_F: f64 = 10.0;

/// Climatological chance of precipitation used for synthetic days.
const FALLBACK_PRECIPITATION_CHANCE: u8 = 30;

pub const FALLBACK_SUMMARY: &str = "Seasonal average (live forecast unavailable)";

/// Build a fallback report for `request` starting today.
pub fn fallback_report(provider: ProviderId, request: &ForecastRequest, error: String) -> WeatherReport {
    let now = Utc::now();
    WeatherReport {
        provider,
        latitude: request.latitude,
        longitude: request.longitude,
        generated_at: now,
        days: climatology(request, now.date_naive()),
        fallback: true,
        error: Some(error),
    }
}

/// Synthetic daily forecasts for `request.days` days from `start`.
pub fn climatology(request: &ForecastRequest, start: NaiveDate) -> Vec<DailyForecast> {
    (0..u64::from(request.days))
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .map(|date| {
            let mean = seasonal_mean_f(request.latitude, date);
            DailyForecast {
                date,
                high_f: round1(mean + DIURNAL_HALF_RANGE_F),
                low_f: round1(mean - DIURNAL_HALF_RANGE_F),
                precipitation_chance: FALLBACK_PRECIPITATION_CHANCE,
                summary: FALLBACK_SUMMARY.to_string(),
            }
        })
        .collect()
}

/// Mean daily temperature (°F) for a latitude on a date.
fn seasonal_mean_f(latitude: f64, date: NaiveDate) -> f64 {
    let abs_lat = latitude.abs().min(90.0);
    let annual_mean = 80.0 - 0.6 * abs_lat;
    let amplitude = (0.45 * abs_lat).min(30.0);

    let peak = if latitude < 0.0 {
        NORTHERN_PEAK_DAY - 182.5
    } else {
        NORTHERN_PEAK_DAY
    };
    let phase = 2.0 * PI * (f64::from(date.ordinal()) - peak) / 365.25;
    annual_mean + amplitude * phase.cos()
}
