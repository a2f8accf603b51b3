//! Verdance weather proxy.
//!
//! Fetches forecasts from upstream providers, normalizes them into a single
//! [`WeatherReport`] shape, caches successful reports, and degrades to a
//! climatology-based fallback report when a provider fails.
//!
//! - [`provider`]: the [`WeatherProvider`] trait.
//! - [`nws`]: US National Weather Service (api.weather.gov).
//! - [`openweathermap`]: OpenWeatherMap 5-day forecast.
//! - [`fallback`]: seasonal climatology used when upstream fails.
//! - [`service`]: provider selection, caching and fallback.

pub mod error;
pub mod fallback;
pub mod model;
pub mod nws;
pub mod openweathermap;
pub mod provider;
pub mod service;

pub use error::WeatherError;
pub use model::{DailyForecast, ForecastRequest, ProviderId, WeatherReport};
pub use provider::WeatherProvider;
pub use service::{ForecastSource, WeatherOutcome, WeatherService, WeatherSettings};
