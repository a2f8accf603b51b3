use std::sync::Arc;

use verdance_store::GardenStore;
use verdance_weather::WeatherService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc` or is a handle.
#[derive(Clone)]
pub struct AppState {
    /// Garden persistence over the configured backend.
    pub gardens: GardenStore,
    /// Weather providers with their forecast cache.
    pub weather: WeatherService,
    /// Server configuration; the router and its middleware read it from here.
    pub config: Arc<ServerConfig>,
}
