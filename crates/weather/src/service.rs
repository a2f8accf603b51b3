//! Provider selection, caching and graceful degradation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::error::WeatherError;
use crate::fallback::fallback_report;
use crate::model::{ForecastRequest, ProviderId, WeatherReport};
use crate::nws::NwsProvider;
use crate::openweathermap::OpenWeatherMapProvider;
use crate::provider::WeatherProvider;

/// Maximum number of cached reports.
const CACHE_CAPACITY: u64 = 1_000;

/// Settings for building the default provider set.
#[derive(Debug, Clone)]
pub struct WeatherSettings {
    /// Sent on every upstream request (NWS rejects requests without one).
    pub user_agent: String,
    /// Per-request upstream timeout.
    pub request_timeout: Duration,
    /// How long successful reports stay cached.
    pub cache_ttl: Duration,
    pub openweathermap_api_key: Option<String>,
}

/// Where a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastSource {
    Upstream,
    Cache,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct WeatherOutcome {
    pub report: WeatherReport,
    pub source: ForecastSource,
}

/// Weather front door: picks a provider, serves from cache, and never fails.
#[derive(Clone)]
pub struct WeatherService {
    providers: HashMap<ProviderId, Arc<dyn WeatherProvider>>,
    cache: Cache<String, WeatherReport>,
}

impl WeatherService {
    /// Build the service with the NWS and OpenWeatherMap providers sharing
    /// one HTTP client.
    pub fn new(settings: &WeatherSettings) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.request_timeout)
            .build()?;

        let providers: Vec<Arc<dyn WeatherProvider>> = vec![
            Arc::new(NwsProvider::new(client.clone())),
            Arc::new(OpenWeatherMapProvider::new(
                client,
                settings.openweathermap_api_key.clone(),
            )),
        ];
        Ok(Self::with_providers(providers, settings.cache_ttl))
    }

    /// Build the service from an explicit provider list.
    pub fn with_providers(providers: Vec<Arc<dyn WeatherProvider>>, cache_ttl: Duration) -> Self {
        let providers = providers
            .into_iter()
            .map(|provider| (provider.id(), provider))
            .collect();
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(cache_ttl)
            .build();
        Self { providers, cache }
    }

    /// Forecast from `provider`.
    ///
    /// Provider errors never escape: they are logged and answered with a
    /// fallback report. Only live upstream reports are cached.
    pub async fn forecast(&self, provider: ProviderId, request: &ForecastRequest) -> WeatherOutcome {
        let key = request.cache_key(provider);
        if let Some(report) = self.cache.get(&key).await {
            tracing::debug!(%provider, key = %key, "Weather cache hit");
            return WeatherOutcome {
                report,
                source: ForecastSource::Cache,
            };
        }

        let result = match self.providers.get(&provider) {
            Some(upstream) => upstream.fetch(request).await,
            None => Err(WeatherError::ProviderUnavailable(provider.as_str())),
        };

        match result {
            Ok(report) => {
                self.cache.insert(key, report.clone()).await;
                WeatherOutcome {
                    report,
                    source: ForecastSource::Upstream,
                }
            }
            Err(e) => {
                tracing::warn!(
                    %provider,
                    latitude = request.latitude,
                    longitude = request.longitude,
                    error = %e,
                    "Weather provider failed, serving fallback data"
                );
                WeatherOutcome {
                    report: fallback_report(provider, request, e.to_string()),
                    source: ForecastSource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use crate::model::DailyForecast;

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Nws
        }

        async fn fetch(&self, request: &ForecastRequest) -> Result<WeatherReport, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WeatherError::Upstream {
                    status: 503,
                    body: "maintenance".into(),
                });
            }
            Ok(WeatherReport {
                provider: ProviderId::Nws,
                latitude: request.latitude,
                longitude: request.longitude,
                generated_at: Utc::now(),
                days: vec![DailyForecast {
                    date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                    high_f: 70.0,
                    low_f: 50.0,
                    precipitation_chance: 10,
                    summary: "Sunny".into(),
                }],
                fallback: false,
                error: None,
            })
        }
    }

    fn service(fail: bool) -> (WeatherService, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            fail,
        });
        let service = WeatherService::with_providers(
            vec![provider.clone() as Arc<dyn WeatherProvider>],
            Duration::from_secs(60),
        );
        (service, provider)
    }

    const REQUEST: ForecastRequest = ForecastRequest {
        latitude: 38.9,
        longitude: -77.0,
        days: 3,
    };

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let (service, provider) = service(false);

        let first = service.forecast(ProviderId::Nws, &REQUEST).await;
        let second = service.forecast(ProviderId::Nws, &REQUEST).await;

        assert_eq!(first.source, ForecastSource::Upstream);
        assert_eq!(second.source, ForecastSource::Cache);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_fall_back_and_are_not_cached() {
        let (service, provider) = service(true);

        let first = service.forecast(ProviderId::Nws, &REQUEST).await;
        let second = service.forecast(ProviderId::Nws, &REQUEST).await;

        assert_eq!(first.source, ForecastSource::Fallback);
        assert!(first.report.fallback);
        assert!(first.report.error.as_deref().unwrap().contains("503"));
        assert_eq!(second.source, ForecastSource::Fallback);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unregistered_provider_falls_back() {
        let (service, _) = service(false);
        let outcome = service.forecast(ProviderId::OpenWeatherMap, &REQUEST).await;
        assert_eq!(outcome.source, ForecastSource::Fallback);
        assert_eq!(outcome.report.provider, ProviderId::OpenWeatherMap);
        assert_eq!(outcome.report.days.len(), 3);
    }
}
