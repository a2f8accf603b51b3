//! Handler for the weather proxy.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use verdance_weather::ForecastSource;

use crate::error::{AppError, AppResult};
use crate::query::WeatherQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// `Cache-Control` for live and cached forecasts.
pub const FORECAST_CACHE_CONTROL: &str = "public, max-age=1800, stale-while-revalidate=3600";

/// `Cache-Control` for fallback data, which must not be reused.
pub const FALLBACK_CACHE_CONTROL: &str = "no-store";

/// GET /weather?provider=&lat=&lon=&days=
///
/// Invalid parameters are a 400. Upstream failures are not errors: they
/// produce a 200 carrying `fallback: true` and seasonal estimates.
pub async fn forecast(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let (provider, request) = params.into_request()?;

    let outcome = state.weather.forecast(provider, &request).await;

    let cache_control = match outcome.source {
        ForecastSource::Fallback => FALLBACK_CACHE_CONTROL,
        ForecastSource::Upstream | ForecastSource::Cache => FORECAST_CACHE_CONTROL,
    };

    Ok((
        [(CACHE_CONTROL, HeaderValue::from_static(cache_control))],
        Json(DataResponse {
            data: outcome.report,
        }),
    )
        .into_response())
}
