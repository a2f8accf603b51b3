//! Route definitions for the `/garden` resource.
//!
//! Also nests the garden-scoped planner routes under `/garden/{id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{garden, planner};
use crate::state::AppState;

/// Routes mounted at `/garden`.
///
/// ```text
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// POST   /{id}                      -> save
/// DELETE /{id}                      -> delete
///
/// GET    /{id}/recommendations      -> planner::recommendations
/// GET    /{id}/investments          -> planner::investments
/// GET    /{id}/calendar             -> planner::calendar
/// GET    /{id}/crops/suggested      -> planner::suggested_crops
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(garden::create))
        .route(
            "/{id}",
            get(garden::get_by_id)
                .post(garden::save)
                .delete(garden::delete),
        )
        .route("/{id}/recommendations", get(planner::recommendations))
        .route("/{id}/investments", get(planner::investments))
        .route("/{id}/calendar", get(planner::calendar))
        .route("/{id}/crops/suggested", get(planner::suggested_crops))
}
