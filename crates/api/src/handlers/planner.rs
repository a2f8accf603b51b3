//! Planner endpoints: crop catalog, recommendations, investments, calendar.
//!
//! Garden-scoped handlers read the stored record's `location` and
//! `cropStatus`. Either one being malformed is logged and replaced by its
//! default so a bad field never blocks planning.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use verdance_core::calendar::{generate_calendar, CalendarActivity};
use verdance_core::crops::{suggest_crops, Crop, CropStatus, CropStatusRegistry, CropSuggestion, CATALOG};
use verdance_core::garden::{validate_garden_id, GardenRecord};
use verdance_core::investment::{investment_recommendations, Investment};
use verdance_core::location::LocationConfig;
use verdance_core::recommendations::{seasonal_recommendations, Recommendation};
use verdance_core::season::{Month, Season};

use crate::error::{AppError, AppResult};
use crate::handlers::garden::find_garden;
use crate::query::{BudgetQuery, MonthQuery, YearQuery};
use crate::response::DataResponse;
use crate::state::AppState;

/// How many suggested crops seed the calendar of a garden with nothing growing.
pub const CALENDAR_SUGGESTION_LIMIT: usize = 6;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalRecommendations {
    pub month: Month,
    pub season: Season,
    pub recommendations: Vec<Recommendation>,
}

/// Where the calendar's crop list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarCropSource {
    Growing,
    Suggested,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenCalendar {
    pub year: i32,
    pub crop_source: CalendarCropSource,
    pub crops: Vec<String>,
    pub activities: Vec<CalendarActivity>,
}

/* --------------------------------------------------------------------------
   Garden context
   -------------------------------------------------------------------------- */

async fn load_garden(state: &AppState, id: &str) -> AppResult<GardenRecord> {
    validate_garden_id(id)?;
    find_garden(state, id).await
}

fn garden_location(id: &str, record: &GardenRecord) -> LocationConfig {
    record.location().unwrap_or_else(|e| {
        tracing::warn!(garden_id = %id, error = %e, "Ignoring invalid location overrides");
        LocationConfig::default()
    })
}

fn garden_crop_status(id: &str, record: &GardenRecord) -> CropStatusRegistry {
    let registry = record.crop_status().unwrap_or_else(|e| {
        tracing::warn!(garden_id = %id, error = %e, "Ignoring invalid crop status");
        CropStatusRegistry::default()
    });

    let overlapping = registry.overlapping_keys();
    if !overlapping.is_empty() {
        tracing::debug!(garden_id = %id, crops = ?overlapping, "Crop listed under several statuses");
    }
    registry
}

/* --------------------------------------------------------------------------
   Handlers
   -------------------------------------------------------------------------- */

/// GET /crops
pub async fn list_crops() -> Json<DataResponse<&'static [Crop]>> {
    Json(DataResponse { data: CATALOG })
}

/// GET /garden/{id}/recommendations?month=
pub async fn recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<MonthQuery>,
) -> AppResult<Json<DataResponse<SeasonalRecommendations>>> {
    let record = load_garden(&state, &id).await?;
    let location = garden_location(&id, &record);
    let registry = garden_crop_status(&id, &record);

    let month = params.resolve(Utc::now().date_naive());
    let recommendations = seasonal_recommendations(month, &location, &registry);

    Ok(Json(DataResponse {
        data: SeasonalRecommendations {
            month,
            season: Season::for_month(month, location.hemisphere()),
            recommendations,
        },
    }))
}

/// GET /garden/{id}/investments?budget=
pub async fn investments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<BudgetQuery>, QueryRejection>,
) -> AppResult<Json<DataResponse<Vec<Investment>>>> {
    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let record = load_garden(&state, &id).await?;
    let location = garden_location(&id, &record);

    Ok(Json(DataResponse {
        data: investment_recommendations(&location, params.budget),
    }))
}

/// GET /garden/{id}/calendar?year=
///
/// Covers the garden's growing crops, or its top suggestions when nothing
/// is growing.
pub async fn calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> AppResult<Json<DataResponse<GardenCalendar>>> {
    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let year = params.resolve(Utc::now().date_naive())?;

    let record = load_garden(&state, &id).await?;
    let location = garden_location(&id, &record);
    let registry = garden_crop_status(&id, &record);

    let growing: Vec<String> = registry
        .growing
        .iter()
        .filter(|key| registry.status_of(key) == CropStatus::Growing)
        .cloned()
        .collect();

    let (crop_source, crops) = if growing.is_empty() {
        let suggested = suggest_crops(&location)
            .into_iter()
            .take(CALENDAR_SUGGESTION_LIMIT)
            .map(|s| s.crop.key.to_string())
            .collect();
        (CalendarCropSource::Suggested, suggested)
    } else {
        (CalendarCropSource::Growing, growing)
    };

    let activities = generate_calendar(&location, &crops, year);

    Ok(Json(DataResponse {
        data: GardenCalendar {
            year,
            crop_source,
            crops,
            activities,
        },
    }))
}

/// GET /garden/{id}/crops/suggested
pub async fn suggested_crops(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<CropSuggestion>>>> {
    let record = load_garden(&state, &id).await?;
    let location = garden_location(&id, &record);

    Ok(Json(DataResponse {
        data: suggest_crops(&location),
    }))
}
