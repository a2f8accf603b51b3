use axum::routing::get;
use axum::Router;

use crate::handlers::{planner, weather};
use crate::state::AppState;

/// Reference-data routes: the weather proxy and the crop catalog.
///
/// ```text
/// GET /weather      -> weather::forecast
/// GET /crops        -> planner::list_crops
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather::forecast))
        .route("/crops", get(planner::list_crops))
}
