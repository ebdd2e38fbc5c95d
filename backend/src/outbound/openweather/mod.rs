//! OpenWeather outbound adapter.
//!
//! Thin HTTP implementation of the `WeatherSource` port over the provider's
//! `/weather` and `/forecast` endpoints.

mod config;
mod dto;
mod http_source;

pub use config::{ApiKey, OpenWeatherConfig, REDACTED};
pub use http_source::{OpenWeatherClientError, OpenWeatherHttpSource, redacted_query};
