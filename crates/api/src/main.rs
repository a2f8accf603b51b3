use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdance_store::{BlobStore, GardenStore, KeyValueStore, MemoryStore, PgStore};
use verdance_weather::WeatherService;

use verdance_api::config::{LogFormat, ServerConfig, StorageBackend, StorageConfig};
use verdance_api::router::build_app_router;
use verdance_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        environment = ?config.environment,
        "Loaded server configuration"
    );

    // --- Storage ---
    let backend = open_storage(&config.storage).await;
    backend
        .health_check()
        .await
        .expect("Storage health check failed");
    tracing::info!(backend = backend.backend_name(), "Storage ready");

    // --- Weather ---
    let weather =
        WeatherService::new(&config.weather.settings()).expect("Failed to build weather HTTP client");
    if config.weather.openweathermap_api_key.is_none() {
        tracing::warn!("OPENWEATHERMAP_API_KEY not set, openweathermap requests will use fallback data");
    }

    // --- App state ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState {
        gardens: GardenStore::new(backend),
        weather,
        config: Arc::new(config),
    };

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "verdance_api=debug,verdance_store=debug,verdance_weather=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Open the configured storage backend. Panics on failure so a bad
/// deployment never starts serving.
async fn open_storage(storage: &StorageConfig) -> Arc<dyn KeyValueStore> {
    match storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, gardens are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Blob => {
            let store = BlobStore::open(storage.blob_dir.clone())
                .await
                .expect("Failed to open blob storage directory");
            tracing::info!(root = %store.root().display(), "Blob storage opened");
            Arc::new(store)
        }
        StorageBackend::Postgres => {
            let database_url = storage
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");
            let store = PgStore::connect(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created and migrations applied");
            Arc::new(store)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
