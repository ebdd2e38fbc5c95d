//! Immutable connection settings for the OpenWeather adapter.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use zeroize::Zeroizing;

/// Placeholder printed wherever the API key would otherwise appear.
pub const REDACTED: &str = "******";

/// OpenWeather API key. Never printed; wiped from memory on drop.
#[derive(Clone)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Where and how to reach the provider.
#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    /// Base URL, e.g. `https://api.openweathermap.org/data/2.5`.
    pub base_url: Url,
    pub api_key: ApiKey,
    /// Whole-request timeout enforced by the HTTP client.
    pub request_timeout: Duration,
}
