pub mod garden;
pub mod health;
pub mod weather;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /garden                                   create (POST)
/// /garden/{id}                              get, upsert, delete
/// /garden/{id}/recommendations              seasonal recommendations (?month=)
/// /garden/{id}/investments                  infrastructure investments (?budget=)
/// /garden/{id}/calendar                     planting calendar (?year=)
/// /garden/{id}/crops/suggested              crops suited to the garden's climate
///
/// /weather                                  forecast proxy (?provider=&lat=&lon=&days=)
/// /crops                                    crop catalog
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/garden", garden::router())
        .merge(weather::router())
}
