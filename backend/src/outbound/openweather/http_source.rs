//! Reqwest-backed OpenWeather source adapter.
//!
//! This adapter owns transport details only: query construction, timeout,
//! redacted request logging, status mapping and JSON decoding into snapshots.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::form_urlencoded;

use super::config::{ApiKey, OpenWeatherConfig, REDACTED};
use super::dto::ErrorEnvelopeDto;
use crate::domain::ports::{WeatherSource, WeatherSourceError};
use crate::domain::{City, ForecastSnapshot, WeatherSnapshot};

const UNITS: &str = "metric";
const API_KEY_PARAM: &str = "appid";

/// Failures building the adapter.
#[derive(Debug, Error)]
pub enum OpenWeatherClientError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("OpenWeather base URL cannot carry path segments: {0}")]
    InvalidBaseUrl(Url),
}

/// OpenWeather source adapter issuing one GET per lookup.
pub struct OpenWeatherHttpSource {
    client: Client,
    weather_url: Url,
    forecast_url: Url,
    api_key: ApiKey,
}

impl OpenWeatherHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot be extended with `/weather` and `/forecast`.
    pub fn new(config: OpenWeatherConfig) -> Result<Self, OpenWeatherClientError> {
        let OpenWeatherConfig {
            base_url,
            api_key,
            request_timeout,
        } = config;
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            weather_url: endpoint(&base_url, "weather")?,
            forecast_url: endpoint(&base_url, "forecast")?,
            api_key,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &Url,
        city: &City,
    ) -> Result<T, WeatherSourceError> {
        let params = [
            ("q", city.as_str()),
            (API_KEY_PARAM, self.api_key.expose()),
            ("units", UNITS),
        ];
        debug!(url = %url, query = %redacted_query(&params), "requesting OpenWeather");

        let response = self
            .client
            .get(url.clone())
            .query(&params)
            .send()
            .await
            .map_err(|err| map_transport_error(city, &err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_transport_error(city, &err))?;
        if !status.is_success() {
            return Err(map_status_error(city, status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref()).map_err(|err| {
            error!(city = %city, error = %err, "OpenWeather returned an undecodable body");
            WeatherSourceError::transport_failure(format!("invalid OpenWeather payload: {err}"))
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherHttpSource {
    async fn fetch_current(&self, city: &City) -> Result<WeatherSnapshot, WeatherSourceError> {
        self.fetch(&self.weather_url, city).await
    }

    async fn fetch_forecast(&self, city: &City) -> Result<ForecastSnapshot, WeatherSourceError> {
        self.fetch(&self.forecast_url, city).await
    }
}

fn endpoint(base: &Url, segment: &str) -> Result<Url, OpenWeatherClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| OpenWeatherClientError::InvalidBaseUrl(base.clone()))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

/// Render query parameters for logging with the API key masked.
///
/// # Examples
/// ```
/// use weather_gateway::outbound::openweather::redacted_query;
///
/// let rendered = redacted_query(&[("q", "Paris"), ("appid", "secret"), ("units", "metric")]);
/// assert_eq!(rendered, "q=Paris&appid=******&units=metric");
/// ```
pub fn redacted_query(params: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for &(name, value) in params {
        let value = if name == API_KEY_PARAM { REDACTED } else { value };
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

fn map_transport_error(city: &City, err: &reqwest::Error) -> WeatherSourceError {
    error!(city = %city, error = %err, timeout = err.is_timeout(), "OpenWeather request failed");
    WeatherSourceError::transport_failure(err.to_string())
}

fn map_status_error(city: &City, status: StatusCode, body: &[u8]) -> WeatherSourceError {
    let code = status.as_u16();
    if status == StatusCode::NOT_FOUND {
        warn!(city = %city, "OpenWeather does not know city");
        return WeatherSourceError::not_found(city.as_str());
    }
    if status.is_server_error() {
        let detail = format!("status {code}: {}", body_preview(body));
        error!(city = %city, status = code, detail = %detail, "OpenWeather unavailable");
        return WeatherSourceError::upstream_unavailable(detail);
    }

    let message = ErrorEnvelopeDto::message_from(body)
        .unwrap_or_else(|| format!("Request failed with status code {code}"));
    warn!(city = %city, status = code, message = %message, "OpenWeather rejected request");
    WeatherSourceError::upstream_rejected(code, message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
#[path = "http_source_tests.rs"]
mod tests;
