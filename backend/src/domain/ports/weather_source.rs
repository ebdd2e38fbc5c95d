//! Driven port for the upstream weather provider.
//!
//! Adapters translate every transport or provider failure into one of the
//! four [`WeatherSourceError`] kinds; nothing else crosses this boundary.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{City, ForecastSnapshot, WeatherSnapshot};

define_port_error! {
    /// Typed weather API error carrying an HTTP-style status and a public
    /// message. `Display` renders the public message.
    pub enum WeatherSourceError {
        /// Provider does not know the city.
        NotFound { city: String } => "City '{city}' not found",
        /// Provider answered with a 5xx; `detail` is for logs only.
        UpstreamUnavailable { detail: String } =>
            "Weather service temporarily unavailable",
        /// Provider rejected the request with another non-success status.
        UpstreamRejected { status: u16, message: String } => "{message}",
        /// No usable response reached the client; `detail` is for logs only.
        TransportFailure { detail: String } => "Unexpected error occurred",
    }
}

impl WeatherSourceError {
    /// HTTP-style status surfaced to callers.
    ///
    /// # Examples
    /// ```
    /// use weather_gateway::domain::ports::WeatherSourceError;
    ///
    /// assert_eq!(WeatherSourceError::not_found("Atlantis").status(), 404);
    /// assert_eq!(WeatherSourceError::upstream_unavailable("boom").status(), 502);
    /// ```
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::UpstreamUnavailable { .. } => 502,
            Self::UpstreamRejected { status, .. } => *status,
            Self::TransportFailure { .. } => 500,
        }
    }

    /// Message safe to show to end users.
    pub fn public_message(&self) -> String {
        self.to_string()
    }
}

/// Port fetching current weather and forecasts for a city.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch current conditions with one upstream request.
    async fn fetch_current(&self, city: &City) -> Result<WeatherSnapshot, WeatherSourceError>;

    /// Fetch the forecast with one upstream request.
    async fn fetch_forecast(&self, city: &City) -> Result<ForecastSnapshot, WeatherSourceError>;
}

/// Fixture source that knows no cities.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWeatherSource;

#[async_trait]
impl WeatherSource for FixtureWeatherSource {
    async fn fetch_current(&self, city: &City) -> Result<WeatherSnapshot, WeatherSourceError> {
        Err(WeatherSourceError::not_found(city.as_str()))
    }

    async fn fetch_forecast(&self, city: &City) -> Result<ForecastSnapshot, WeatherSourceError> {
        Err(WeatherSourceError::not_found(city.as_str()))
    }
}
