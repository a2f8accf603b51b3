#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::{Days, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use verdance_api::config::{
    Environment, LogFormat, ServerConfig, StorageBackend, StorageConfig, WeatherConfig,
};
use verdance_api::router::build_app_router;
use verdance_api::state::AppState;
use verdance_store::{GardenStore, KeyValueStore, MemoryStore, StoreError};
use verdance_weather::{
    DailyForecast, ForecastRequest, ProviderId, WeatherError, WeatherProvider, WeatherReport,
    WeatherService,
};

/// Build a test `ServerConfig` with safe defaults.
///
/// Production environment, so internal error details stay hidden.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        environment: Environment::Production,
        log_format: LogFormat::Text,
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            blob_dir: PathBuf::from("./data"),
            database_url: None,
        },
        weather: WeatherConfig {
            user_agent: "verdance-tests".to_string(),
            timeout_secs: 5,
            cache_ttl_secs: 60,
            openweathermap_api_key: None,
        },
    }
}

/* --------------------------------------------------------------------------
   Weather stubs
   -------------------------------------------------------------------------- */

/// A provider that answers from memory, or fails like an unreachable
/// upstream.
pub struct StubProvider {
    pub id: ProviderId,
    pub fail: bool,
}

#[async_trait]
impl WeatherProvider for StubProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn fetch(&self, request: &ForecastRequest) -> Result<WeatherReport, WeatherError> {
        if self.fail {
            return Err(WeatherError::Upstream {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }

        let today = Utc::now().date_naive();
        let days = (0..u64::from(request.days))
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .map(|date| DailyForecast {
                date,
                high_f: 78.0,
                low_f: 61.0,
                precipitation_chance: 20,
                summary: "Partly Sunny".to_string(),
            })
            .collect();

        Ok(WeatherReport {
            provider: self.id,
            latitude: request.latitude,
            longitude: request.longitude,
            generated_at: Utc::now(),
            days,
            fallback: false,
            error: None,
        })
    }
}

/// NWS answers, OpenWeatherMap is down.
pub fn test_weather() -> WeatherService {
    let providers: Vec<Arc<dyn WeatherProvider>> = vec![
        Arc::new(StubProvider {
            id: ProviderId::Nws,
            fail: false,
        }),
        Arc::new(StubProvider {
            id: ProviderId::OpenWeatherMap,
            fail: true,
        }),
    ];
    WeatherService::with_providers(providers, Duration::from_secs(60))
}

/* --------------------------------------------------------------------------
   Storage stubs
   -------------------------------------------------------------------------- */

/// A backend whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Err(broken())
    }

    async fn set(&self, _key: &str, _value: &serde_json::Value) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        Err(broken())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(broken())
    }

    fn backend_name(&self) -> &'static str {
        "broken"
    }
}

fn broken() -> StoreError {
    StoreError::Io(std::io::Error::other("disk on fire"))
}

/* --------------------------------------------------------------------------
   App builders
   -------------------------------------------------------------------------- */

/// Application state over the given backend with stub weather providers.
pub fn test_state(backend: Arc<dyn KeyValueStore>) -> AppState {
    test_state_with_config(backend, test_config())
}

/// Like [`test_state`] but with a custom configuration.
pub fn test_state_with_config(backend: Arc<dyn KeyValueStore>, config: ServerConfig) -> AppState {
    AppState {
        gardens: GardenStore::new(backend),
        weather: test_weather(),
        config: Arc::new(config),
    }
}

/// Fresh state over an empty in-memory store.
pub fn memory_state() -> AppState {
    test_state(Arc::new(MemoryStore::new()))
}

/// Build the full application router over `state`.
///
/// Uses the same builder as `main.rs` so integration tests exercise the
/// production middleware stack. Clone `state` to share storage between
/// requests.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state)
}

/* --------------------------------------------------------------------------
   Request helpers
   -------------------------------------------------------------------------- */

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

/// POST a body verbatim with a JSON content type.
pub async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
