//! Handlers for the `/garden` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use verdance_core::error::CoreError;
use verdance_core::garden::{new_garden_id, validate_garden_id, GardenRecord};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a garden or fail with 404. The ID must already be validated.
pub(crate) async fn find_garden(state: &AppState, id: &str) -> AppResult<GardenRecord> {
    state
        .gardens
        .load(id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Garden",
                id: id.to_string(),
            })
        })
}

fn json_payload(body: Result<Json<serde_json::Value>, JsonRejection>) -> AppResult<serde_json::Value> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| AppError::BadRequest(format!("Invalid garden data: {}", rejection.body_text())))
}

/// GET /garden/{id}
///
/// Returns the stored record with `lastAccessed` refreshed. The refreshed
/// record is written back best-effort.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<GardenRecord>>> {
    validate_garden_id(&id)?;

    let mut record = find_garden(&state, &id).await?;
    record.touch(Utc::now());

    if let Err(e) = state.gardens.save(&id, &record).await {
        tracing::warn!(garden_id = %id, error = %e, "Failed to record garden access time");
    }

    Ok(Json(DataResponse { data: record }))
}

/// POST /garden/{id}
///
/// Upserts the garden. The body must be a JSON object; `gardenId` and
/// `lastModified` are set by the server.
pub async fn save(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<Json<DataResponse<GardenRecord>>> {
    validate_garden_id(&id)?;
    let payload = json_payload(body)?;

    let record = GardenRecord::from_payload(&id, payload, Utc::now())?;
    state.gardens.save(&id, &record).await?;
    tracing::info!(garden_id = %id, fields = record.fields().len(), "Garden saved");

    Ok(Json(DataResponse { data: record }))
}

/// POST /garden
///
/// Creates a garden under a freshly generated ID.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<GardenRecord>>)> {
    let payload = json_payload(body)?;
    let id = new_garden_id();

    let record = GardenRecord::from_payload(&id, payload, Utc::now())?;
    state.gardens.save(&id, &record).await?;
    tracing::info!(garden_id = %id, "Garden created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// DELETE /garden/{id}
///
/// Idempotent: deleting a garden that does not exist still succeeds.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    validate_garden_id(&id)?;

    let existed = state.gardens.delete(&id).await?;
    tracing::info!(garden_id = %id, existed, "Garden deleted");

    Ok(StatusCode::NO_CONTENT)
}
