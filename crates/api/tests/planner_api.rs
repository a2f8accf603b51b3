//! Integration tests for the crop catalog and garden planner endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::{body_json, get, post_json};
use serde_json::json;
use verdance_api::state::AppState;

const GARDEN_ID: &str = "planner-garden-0001";

async fn seed_garden(state: &AppState, payload: serde_json::Value) {
    let response = post_json(
        common::build_test_app(state.clone()),
        &format!("/garden/{GARDEN_ID}"),
        payload,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn get_data(state: &AppState, uri: &str) -> serde_json::Value {
    let response = get(common::build_test_app(state.clone()), uri).await;
    assert_eq!(response.status(), StatusCode::OK, "{uri}");
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Test: crop catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn crop_catalog_is_sorted_by_key() {
    let state = common::memory_state();
    let data = get_data(&state, "/crops").await;

    let keys: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert!(!keys.is_empty());
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert!(keys.contains(&"tomato"));
}

// ---------------------------------------------------------------------------
// Test: seasonal recommendations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recommendations_are_bounded_and_use_requested_month() {
    let state = common::memory_state();
    seed_garden(
        &state,
        json!({"cropStatus": {"growing": ["tomato", "pepper"], "dying": ["basil"], "notWanted": ["okra"]}}),
    )
    .await;

    let data = get_data(&state, &format!("/garden/{GARDEN_ID}/recommendations?month=7")).await;

    assert_eq!(data["month"], 7);
    assert_eq!(data["season"], "summer");
    let recommendations = data["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty());
    assert!(recommendations.len() <= 6);
}

#[tokio::test]
async fn southern_gardens_get_opposite_season() {
    let state = common::memory_state();
    seed_garden(&state, json!({"location": {"latitude": -33.9, "longitude": 151.2}})).await;

    let data = get_data(&state, &format!("/garden/{GARDEN_ID}/recommendations?month=7")).await;
    assert_eq!(data["season"], "winter");
}

#[tokio::test]
async fn invalid_month_uses_current_month() {
    let state = common::memory_state();
    seed_garden(&state, json!({})).await;
    let current = Utc::now().month();

    let data = get_data(&state, &format!("/garden/{GARDEN_ID}/recommendations?month=13")).await;
    assert_eq!(data["month"], current);

    let data = get_data(&state, &format!("/garden/{GARDEN_ID}/recommendations")).await;
    assert_eq!(data["month"], current);
}

#[tokio::test]
async fn invalid_location_falls_back_to_defaults() {
    let state = common::memory_state();
    seed_garden(&state, json!({"location": "somewhere sunny", "cropStatus": 7})).await;

    let data = get_data(&state, &format!("/garden/{GARDEN_ID}/recommendations?month=4")).await;
    assert_eq!(data["season"], "spring");
}

// ---------------------------------------------------------------------------
// Test: investments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn investments_respect_budget() {
    let state = common::memory_state();
    seed_garden(
        &state,
        json!({"location": {"summerHighF": 97, "annualRainfallInches": 12, "windExposed": true}}),
    )
    .await;

    let all = get_data(&state, &format!("/garden/{GARDEN_ID}/investments")).await;
    let all = all.as_array().unwrap();
    assert!(!all.is_empty());
    assert!(all.len() <= 5);

    let cheap = get_data(&state, &format!("/garden/{GARDEN_ID}/investments?budget=100")).await;
    assert!(cheap
        .as_array()
        .unwrap()
        .iter()
        .all(|i| i["estimatedCostUsd"].as_u64().unwrap() <= 100));
}

#[tokio::test]
async fn non_numeric_budget_returns_400() {
    let state = common::memory_state();
    seed_garden(&state, json!({})).await;

    let response = get(
        common::build_test_app(state),
        &format!("/garden/{GARDEN_ID}/investments?budget=lots"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: calendar
// ---------------------------------------------------------------------------

#[tokio::test]
async fn calendar_covers_growing_crops() {
    let state = common::memory_state();
    seed_garden(
        &state,
        json!({"cropStatus": {"growing": ["tomato", "basil", "kale"], "dying": ["kale"]}}),
    )
    .await;

    let data = get_data(&state, &format!("/garden/{GARDEN_ID}/calendar?year=2026")).await;

    assert_eq!(data["year"], 2026);
    assert_eq!(data["cropSource"], "growing");
    // Kale is also listed as dying, so it is not treated as growing.
    assert_eq!(data["crops"], json!(["basil", "tomato"]));

    let activities = data["activities"].as_array().unwrap();
    assert!(!activities.is_empty());
    assert!(activities
        .iter()
        .all(|a| ["basil", "tomato"].contains(&a["cropKey"].as_str().unwrap())));

    let dates: Vec<&str> = activities.iter().map(|a| a["date"].as_str().unwrap()).collect();
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn calendar_without_growing_crops_uses_suggestions() {
    let state = common::memory_state();
    seed_garden(&state, json!({"name": "Empty plot"})).await;

    let data = get_data(&state, &format!("/garden/{GARDEN_ID}/calendar?year=2026")).await;

    assert_eq!(data["cropSource"], "suggested");
    let crops = data["crops"].as_array().unwrap();
    assert!(!crops.is_empty());
    assert!(crops.len() <= 6);
}

#[tokio::test]
async fn calendar_rejects_out_of_range_year() {
    let state = common::memory_state();
    seed_garden(&state, json!({})).await;

    let response = get(
        common::build_test_app(state),
        &format!("/garden/{GARDEN_ID}/calendar?year=1066"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: crop suggestions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn suggestions_are_ranked_best_first() {
    let state = common::memory_state();
    seed_garden(&state, json!({"location": {"summerHighF": 96}})).await;

    let data = get_data(&state, &format!("/garden/{GARDEN_ID}/crops/suggested")).await;
    let scores: Vec<u64> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["score"].as_u64().unwrap())
        .collect();

    assert!(!scores.is_empty());
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

// ---------------------------------------------------------------------------
// Test: planner routes share the garden ID rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn planner_routes_validate_and_require_the_garden() {
    let state = common::memory_state();

    for suffix in ["recommendations", "investments", "calendar", "crops/suggested"] {
        let response = get(
            common::build_test_app(state.clone()),
            &format!("/garden/short/{suffix}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{suffix}");

        let response = get(
            common::build_test_app(state.clone()),
            &format!("/garden/{GARDEN_ID}/{suffix}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{suffix}");
    }
}
