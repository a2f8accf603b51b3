use async_trait::async_trait;

use crate::error::WeatherError;
use crate::model::{ForecastRequest, ProviderId, WeatherReport};

/// An upstream forecast source.
///
/// Implementations fetch, fail on any non-2xx response, and normalize into a
/// [`WeatherReport`] with `fallback: false` and at most `request.days` days.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn fetch(&self, request: &ForecastRequest) -> Result<WeatherReport, WeatherError>;
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`WeatherError::Upstream`] containing the
/// status and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, WeatherError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(WeatherError::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, WeatherError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}
