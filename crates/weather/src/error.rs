/// Errors from upstream weather providers.
///
/// None of these reach HTTP clients directly: the service converts every
/// provider error into a fallback report.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Upstream weather API error ({status}): {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider needs an API key that is not configured.
    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),

    /// The provider answered with a payload we cannot interpret.
    #[error("Unexpected weather payload: {0}")]
    UnexpectedPayload(String),

    /// No provider is registered under the requested id.
    #[error("Weather provider '{0}' is not configured")]
    ProviderUnavailable(&'static str),
}
