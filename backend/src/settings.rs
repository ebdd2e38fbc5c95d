//! Gateway settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `WEATHER_*` environment variables or a config
//! file, and are converted once at startup into the immutable configuration
//! structs the components take.

use std::fmt;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::ports::CacheTtl;
use crate::domain::{
    DEFAULT_CURRENT_TTL, DEFAULT_FORECAST_TTL, DEFAULT_REFRESH_INTERVAL, RefreshSchedule,
    RefreshScheduleError, WeatherCachePolicy,
};
use crate::middleware::ThrottlePolicy;
use crate::middleware::throttle::{DEFAULT_THROTTLE_LIMIT, DEFAULT_THROTTLE_WINDOW};
use crate::outbound::openweather::{ApiKey, OpenWeatherConfig, REDACTED};

pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Invalid setting values detected while converting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("WEATHER_API_KEY is required")]
    MissingApiKey,
    #[error("WEATHER_API_URL is not a valid URL: {0}")]
    ApiUrl(#[from] url::ParseError),
    #[error("WEATHER_BIND_ADDR is not a socket address: {value}")]
    BindAddr { value: String },
    #[error("WEATHER_REQUEST_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
    #[error("WEATHER_{name} must be greater than zero")]
    ZeroTtl { name: &'static str },
    #[error("WEATHER_{name} must be greater than zero")]
    ZeroThrottle { name: &'static str },
    #[error("invalid refresh interval: {0}")]
    Schedule(#[from] RefreshScheduleError),
}

/// Raw gateway settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WEATHER")]
pub struct GatewaySettings {
    /// OpenWeather base URL, without the `/weather` or `/forecast` suffix.
    pub api_url: Option<String>,
    /// OpenWeather API key. The gateway refuses to start without it.
    pub api_key: Option<String>,
    pub request_timeout_secs: Option<u64>,
    /// Redis connection URL. The in-memory cache is used when absent.
    pub redis_url: Option<String>,
    /// PostgreSQL URL for favourites. Favourites are read-only and empty when
    /// absent.
    pub database_url: Option<String>,
    pub bind_addr: Option<String>,
    pub refresh_interval_minutes: Option<u64>,
    pub current_ttl_minutes: Option<u64>,
    pub forecast_ttl_minutes: Option<u64>,
    /// File holding the key that encrypts session cookies.
    pub session_key_file: Option<PathBuf>,
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Requests one client may make per throttle window.
    pub throttle_limit: Option<u32>,
    /// Throttle window in milliseconds.
    pub throttle_ttl: Option<u64>,
}

impl fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("redis_url", &self.redis_url.as_ref().map(|_| REDACTED))
            .field("database_url", &self.database_url.as_ref().map(|_| REDACTED))
            .field("bind_addr", &self.bind_addr)
            .field("refresh_interval_minutes", &self.refresh_interval_minutes)
            .field("current_ttl_minutes", &self.current_ttl_minutes)
            .field("forecast_ttl_minutes", &self.forecast_ttl_minutes)
            .field("session_key_file", &self.session_key_file)
            .field("cookie_secure", &self.cookie_secure)
            .field("throttle_limit", &self.throttle_limit)
            .field("throttle_ttl", &self.throttle_ttl)
            .finish()
    }
}

impl GatewaySettings {
    /// Provider configuration.
    ///
    /// # Errors
    /// [`SettingsError::MissingApiKey`] when the key is absent or blank.
    pub fn openweather(&self) -> Result<OpenWeatherConfig, SettingsError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingApiKey)?;
        let base_url = Url::parse(self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let request_timeout = match self.request_timeout_secs {
            Some(0) => return Err(SettingsError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_REQUEST_TIMEOUT,
        };
        Ok(OpenWeatherConfig {
            base_url,
            api_key: ApiKey::new(key),
            request_timeout,
        })
    }

    pub fn cache_policy(&self) -> Result<WeatherCachePolicy, SettingsError> {
        Ok(WeatherCachePolicy {
            current_ttl: ttl(self.current_ttl_minutes, DEFAULT_CURRENT_TTL, "CURRENT_TTL_MINUTES")?,
            forecast_ttl: ttl(
                self.forecast_ttl_minutes,
                DEFAULT_FORECAST_TTL,
                "FORECAST_TTL_MINUTES",
            )?,
        })
    }

    pub fn refresh_schedule(&self) -> Result<RefreshSchedule, SettingsError> {
        let interval = self
            .refresh_interval_minutes
            .map_or(DEFAULT_REFRESH_INTERVAL, |minutes| {
                Duration::from_secs(minutes.saturating_mul(60))
            });
        Ok(RefreshSchedule::new(interval)?)
    }

    pub fn throttle_policy(&self) -> Result<ThrottlePolicy, SettingsError> {
        let limit = match self.throttle_limit {
            None => DEFAULT_THROTTLE_LIMIT,
            Some(raw) => NonZeroU32::new(raw).ok_or(SettingsError::ZeroThrottle {
                name: "THROTTLE_LIMIT",
            })?,
        };
        let window = match self.throttle_ttl {
            None => DEFAULT_THROTTLE_WINDOW,
            Some(0) => {
                return Err(SettingsError::ZeroThrottle {
                    name: "THROTTLE_TTL",
                });
            }
            Some(millis) => Duration::from_millis(millis),
        };
        Ok(ThrottlePolicy::new(limit, window))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }
}

fn ttl(
    minutes: Option<u64>,
    default: CacheTtl,
    name: &'static str,
) -> Result<CacheTtl, SettingsError> {
    match minutes {
        None => Ok(default),
        Some(0) => Err(SettingsError::ZeroTtl { name }),
        Some(minutes) => Ok(CacheTtl::from_minutes(minutes)),
    }
}
