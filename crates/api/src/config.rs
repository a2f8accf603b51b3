use std::path::PathBuf;
use std::time::Duration;

use verdance_weather::WeatherSettings;

/// Deployment environment, from `APP_ENV` or `NODE_ENV`.
///
/// Anything other than an explicit development value counts as production,
/// so internal error details are only ever exposed on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Read `APP_ENV`, falling back to `NODE_ENV`.
    pub fn from_env() -> Self {
        let value = std::env::var("APP_ENV")
            .ok()
            .or_else(|| std::env::var("NODE_ENV").ok());
        Self::parse(value.as_deref())
    }

    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("development" | "dev" | "local") => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Log output format (`LOG_FORMAT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Which [`KeyValueStore`](verdance_store::KeyValueStore) backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Blob,
    Postgres,
}

impl StorageBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "blob" | "file" => Some(Self::Blob),
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory of the blob backend.
    pub blob_dir: PathBuf,
    /// Required when `backend` is [`StorageBackend::Postgres`].
    pub database_url: Option<String>,
}

/// Upstream weather settings.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub openweathermap_api_key: Option<String>,
}

impl WeatherConfig {
    pub fn settings(&self) -> WeatherSettings {
        WeatherSettings {
            user_agent: self.user_agent.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            openweathermap_api_key: self.openweathermap_api_key.clone(),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// environment, which defaults to production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub storage: StorageConfig,
    pub weather: WeatherConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                   |
    /// |--------------------------|-------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                 |
    /// | `PORT`                   | `3000`                                    |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`                   |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                      |
    /// | `APP_ENV` / `NODE_ENV`   | `production`                              |
    /// | `LOG_FORMAT`             | `text`                                    |
    /// | `STORAGE_BACKEND`        | `blob`                                    |
    /// | `BLOB_DIR`               | `./data`                                  |
    /// | `DATABASE_URL`           | required when `STORAGE_BACKEND=postgres`  |
    /// | `WEATHER_USER_AGENT`     | `verdance/<version> (garden planner)`     |
    /// | `WEATHER_TIMEOUT_SECS`   | `10`                                      |
    /// | `WEATHER_CACHE_TTL_SECS` | `1800`                                    |
    /// | `OPENWEATHERMAP_API_KEY` | unset                                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let log_format = LogFormat::parse(
            &std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        )
        .expect("LOG_FORMAT must be 'text' or 'json'");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            environment: Environment::from_env(),
            log_format,
            storage: StorageConfig::from_env(),
            weather: WeatherConfig::from_env(),
        }
    }
}

impl StorageConfig {
    fn from_env() -> Self {
        let backend = StorageBackend::parse(
            &std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "blob".into()),
        )
        .expect("STORAGE_BACKEND must be one of 'memory', 'blob', 'postgres'");

        let blob_dir = PathBuf::from(std::env::var("BLOB_DIR").unwrap_or_else(|_| "./data".into()));

        let database_url = match backend {
            StorageBackend::Postgres => Some(
                std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORAGE_BACKEND=postgres"),
            ),
            _ => std::env::var("DATABASE_URL").ok(),
        };

        Self {
            backend,
            blob_dir,
            database_url,
        }
    }
}

impl WeatherConfig {
    fn from_env() -> Self {
        let user_agent = std::env::var("WEATHER_USER_AGENT").unwrap_or_else(|_| {
            format!("verdance/{} (garden planner)", env!("CARGO_PKG_VERSION"))
        });

        let timeout_secs: u64 = std::env::var("WEATHER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("WEATHER_TIMEOUT_SECS must be a valid u64");

        let cache_ttl_secs: u64 = std::env::var("WEATHER_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("WEATHER_CACHE_TTL_SECS must be a valid u64");

        let openweathermap_api_key = std::env::var("OPENWEATHERMAP_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            user_agent,
            timeout_secs,
            cache_ttl_secs,
            openweathermap_api_key,
        }
    }
}
