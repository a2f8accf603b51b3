//! Query-string parameters for the weather and planner endpoints.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use validator::Validate;
use verdance_core::season::Month;
use verdance_weather::{ForecastRequest, ProviderId};

use crate::error::AppError;

/// Forecast length when `days` is omitted.
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

/// `GET /weather` parameters.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct WeatherQuery {
    pub provider: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "lon must be between -180 and 180"))]
    pub lon: Option<f64>,
    #[validate(range(min = 1, max = 14, message = "days must be between 1 and 14"))]
    pub days: Option<u8>,
}

impl WeatherQuery {
    /// Validate and resolve defaults. Runs before any upstream call.
    pub fn into_request(self) -> Result<(ProviderId, ForecastRequest), AppError> {
        self.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let provider = match self.provider.as_deref().map(str::trim) {
            None | Some("") => ProviderId::default(),
            Some(name) => name.parse().map_err(AppError::BadRequest)?,
        };

        let latitude = coordinate(self.lat, "lat")?;
        let longitude = coordinate(self.lon, "lon")?;

        Ok((
            provider,
            ForecastRequest {
                latitude,
                longitude,
                days: self.days.unwrap_or(DEFAULT_FORECAST_DAYS),
            },
        ))
    }
}

fn coordinate(value: Option<f64>, name: &str) -> Result<f64, AppError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(AppError::BadRequest(format!("{name} must be a finite number"))),
        None => Err(AppError::BadRequest(format!("{name} is required"))),
    }
}

/// `?month=` on the recommendations endpoint.
///
/// A missing or invalid month falls back to the current month instead of
/// failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    pub fn resolve(&self, today: NaiveDate) -> Month {
        self.month
            .as_deref()
            .and_then(|m| m.trim().parse::<u8>().ok())
            .and_then(|m| Month::new(m).ok())
            .unwrap_or_else(|| Month::of(&today))
    }
}

/// `?budget=` on the investments endpoint, in whole US dollars.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetQuery {
    pub budget: Option<u32>,
}

/// `?year=` on the calendar endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct YearQuery {
    #[validate(range(min = 1900, max = 2200, message = "year must be between 1900 and 2200"))]
    pub year: Option<i32>,
}

impl YearQuery {
    pub fn resolve(&self, today: NaiveDate) -> Result<i32, AppError> {
        self.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(self.year.unwrap_or_else(|| today.year()))
    }
}
