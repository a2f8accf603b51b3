//! HTTP-level integration tests for the garden persistence endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, post_raw};
use serde_json::json;

const GARDEN_ID: &str = "4f9c2b1e-garden-0001";

// ---------------------------------------------------------------------------
// Test: short IDs are rejected by every method before storage is touched
// ---------------------------------------------------------------------------

#[tokio::test]
async fn short_ids_return_400_on_every_method() {
    // A broken backend proves validation runs before any storage access.
    let state = common::test_state(Arc::new(common::BrokenStore));

    for id in ["a", "short", "123456789"] {
        let uri = format!("/garden/{id}");

        let response = get(common::build_test_app(state.clone()), &uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "GET {uri}");

        let response = post_json(common::build_test_app(state.clone()), &uri, json!({})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "POST {uri}");

        let response = delete(common::build_test_app(state.clone()), &uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "DELETE {uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn ids_with_unsafe_characters_return_400() {
    let state = common::memory_state();
    let response = get(common::build_test_app(state), "/garden/garden.id.with.dots").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: POST then GET returns the posted fields plus timestamps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_then_get_round_trips_payload_with_timestamps() {
    let state = common::memory_state();
    let uri = format!("/garden/{GARDEN_ID}");

    let response = post_json(
        common::build_test_app(state.clone()),
        &uri,
        json!({
            "name": "Backyard",
            "beds": [{"crop": "tomato"}, {"crop": "basil"}],
            "location": {"hardinessZone": "6a"}
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["data"]["gardenId"], GARDEN_ID);
    assert!(saved["data"]["lastModified"].is_string());

    let response = get(common::build_test_app(state.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["name"], "Backyard");
    assert_eq!(data["beds"][1]["crop"], "basil");
    assert_eq!(data["location"]["hardinessZone"], "6a");
    assert_eq!(data["gardenId"], GARDEN_ID);
    assert_eq!(data["lastModified"], saved["data"]["lastModified"]);
    assert!(data["lastAccessed"].is_string());
}

#[tokio::test]
async fn get_persists_last_accessed() {
    let state = common::memory_state();
    let uri = format!("/garden/{GARDEN_ID}");

    post_json(common::build_test_app(state.clone()), &uri, json!({"beds": 2})).await;
    get(common::build_test_app(state.clone()), &uri).await;

    let stored = state.gardens.load(GARDEN_ID).await.unwrap().unwrap();
    assert!(stored.get("lastAccessed").is_some());
}

#[tokio::test]
async fn server_overwrites_reserved_fields() {
    let state = common::memory_state();
    let uri = format!("/garden/{GARDEN_ID}");

    let response = post_json(
        common::build_test_app(state),
        &uri,
        json!({"gardenId": "someone-else-entirely", "lastModified": "1999-01-01T00:00:00Z"}),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["gardenId"], GARDEN_ID);
    assert_ne!(json["data"]["lastModified"], "1999-01-01T00:00:00Z");
}

#[tokio::test]
async fn second_post_replaces_the_record() {
    let state = common::memory_state();
    let uri = format!("/garden/{GARDEN_ID}");

    post_json(common::build_test_app(state.clone()), &uri, json!({"a": 1})).await;
    post_json(common::build_test_app(state.clone()), &uri, json!({"b": 2})).await;

    let json = body_json(get(common::build_test_app(state), &uri).await).await;
    assert!(json["data"].get("a").is_none());
    assert_eq!(json["data"]["b"], 2);
}

// ---------------------------------------------------------------------------
// Test: GET of an unknown garden is 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_missing_garden_returns_404() {
    let state = common::memory_state();
    let response = get(common::build_test_app(state), "/garden/never-saved-0001").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Garden with id never-saved-0001 not found");
}

// ---------------------------------------------------------------------------
// Test: non-object and malformed bodies are 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_object_body_returns_400() {
    let state = common::memory_state();
    let uri = format!("/garden/{GARDEN_ID}");

    for body in [json!([1, 2, 3]), json!("garden"), json!(42), json!(null)] {
        let response = post_json(common::build_test_app(state.clone()), &uri, body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }

    assert!(state.gardens.load(GARDEN_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let state = common::memory_state();
    let response = post_raw(
        common::build_test_app(state),
        &format!("/garden/{GARDEN_ID}"),
        "{\"name\": ",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: DELETE is idempotent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_nonexistent_garden_succeeds() {
    let state = common::memory_state();
    let response = delete(common::build_test_app(state), "/garden/not-there-00001").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_removes_the_garden() {
    let state = common::memory_state();
    let uri = format!("/garden/{GARDEN_ID}");

    post_json(common::build_test_app(state.clone()), &uri, json!({"beds": 1})).await;

    let response = delete(common::build_test_app(state.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(state.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(common::build_test_app(state), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Test: POST /garden creates a garden under a generated ID
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_garden_returns_201_with_generated_id() {
    let state = common::memory_state();
    let response = post_json(
        common::build_test_app(state.clone()),
        "/garden",
        json!({"name": "Allotment"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["gardenId"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 36);
    assert_eq!(json["data"]["name"], "Allotment");

    let response = get(common::build_test_app(state), &format!("/garden/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: storage failures are 500 with a redacted message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn storage_failure_returns_redacted_500() {
    let state = common::test_state(Arc::new(common::BrokenStore));
    let response = get(common::build_test_app(state), &format!("/garden/{GARDEN_ID}")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(json.get("details").is_none());
    assert!(!json.to_string().contains("disk on fire"));
}

#[tokio::test]
async fn failed_access_write_back_does_not_fail_the_read() {
    use async_trait::async_trait;
    use verdance_store::{KeyValueStore, MemoryStore, StoreError};

    /// Reads from memory, refuses every write.
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
            self.0.get(key).await
        }
        async fn set(&self, key: &str, _value: &serde_json::Value) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }
        async fn delete(&self, key: &str) -> Result<bool, StoreError> {
            self.0.delete(key).await
        }
        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
        fn backend_name(&self) -> &'static str {
            "read-only"
        }
    }

    let memory = MemoryStore::new();
    memory
        .set(
            &format!("garden:{GARDEN_ID}"),
            &json!({"gardenId": GARDEN_ID, "beds": 3}),
        )
        .await
        .unwrap();

    let state = common::test_state(Arc::new(ReadOnlyStore(memory)));
    let response = get(common::build_test_app(state), &format!("/garden/{GARDEN_ID}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["beds"], 3);
    assert!(json["data"]["lastAccessed"].is_string());
}

// ---------------------------------------------------------------------------
// Test: the blob backend serves the same contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blob_backend_persists_gardens_as_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = verdance_store::BlobStore::open(dir.path()).await.unwrap();
    let state = common::test_state(Arc::new(store));
    let uri = format!("/garden/{GARDEN_ID}");

    let response = post_json(common::build_test_app(state.clone()), &uri, json!({"beds": 6})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(dir.path().join("garden").join(format!("{GARDEN_ID}.json")).exists());

    let json = body_json(get(common::build_test_app(state.clone()), &uri).await).await;
    assert_eq!(json["data"]["beds"], 6);

    let response = delete(common::build_test_app(state), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!dir.path().join("garden").join(format!("{GARDEN_ID}.json")).exists());
}
