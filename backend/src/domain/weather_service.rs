//! Read-through cache in front of the weather provider.
//!
//! The service owns the cache key scheme and the TTL policy. A successful
//! upstream fetch is always followed by a cache write; a failed fetch never
//! writes. Concurrent misses for the same key are not coalesced, so each one
//! reaches the provider and the last write wins.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::ports::{CacheTtl, WeatherCache, WeatherCacheKey, WeatherSource, WeatherSourceError};
use super::{City, ForecastSnapshot, WeatherSnapshot};

/// Current-weather entries live for five minutes.
pub const DEFAULT_CURRENT_TTL: CacheTtl = CacheTtl::from_minutes(5);
/// Forecast entries live for six hours.
pub const DEFAULT_FORECAST_TTL: CacheTtl = CacheTtl::from_minutes(360);

/// TTLs applied when writing snapshots to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCachePolicy {
    pub current_ttl: CacheTtl,
    pub forecast_ttl: CacheTtl,
}

impl Default for WeatherCachePolicy {
    fn default() -> Self {
        Self {
            current_ttl: DEFAULT_CURRENT_TTL,
            forecast_ttl: DEFAULT_FORECAST_TTL,
        }
    }
}

/// Options for [`WeatherService::forecast`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForecastOptions {
    /// Skip the cache read and always fetch; the cache write still happens.
    pub force_refresh: bool,
}

impl ForecastOptions {
    pub fn force_refresh() -> Self {
        Self {
            force_refresh: true,
        }
    }
}

/// Weather lookups served through the cache.
///
/// Cache faults never surface to callers: an unreadable entry counts as a
/// miss and a failed write is logged. Only [`WeatherSourceError`] escapes.
pub struct WeatherService {
    cache: Arc<dyn WeatherCache>,
    source: Arc<dyn WeatherSource>,
    policy: WeatherCachePolicy,
}

impl WeatherService {
    pub fn new(
        cache: Arc<dyn WeatherCache>,
        source: Arc<dyn WeatherSource>,
        policy: WeatherCachePolicy,
    ) -> Self {
        Self {
            cache,
            source,
            policy,
        }
    }

    pub fn policy(&self) -> WeatherCachePolicy {
        self.policy
    }

    /// Current conditions for `city`, from `weather_<city>` when present.
    pub async fn current_weather(&self, city: &City) -> Result<WeatherSnapshot, WeatherSourceError> {
        let key = WeatherCacheKey::current(city);
        if let Some(snapshot) = self.read_cached::<WeatherSnapshot>(&key).await {
            return Ok(snapshot);
        }

        let snapshot = self.source.fetch_current(city).await?;
        self.write_cached(&key, &snapshot, self.policy.current_ttl)
            .await;
        Ok(snapshot)
    }

    /// Forecast for `city`, from `forecast_<city>` unless a refresh is forced.
    pub async fn forecast(
        &self,
        city: &City,
        options: ForecastOptions,
    ) -> Result<ForecastSnapshot, WeatherSourceError> {
        let key = WeatherCacheKey::forecast(city);
        if !options.force_refresh {
            if let Some(snapshot) = self.read_cached::<ForecastSnapshot>(&key).await {
                return Ok(snapshot);
            }
        }

        let snapshot = self.source.fetch_forecast(city).await?;
        self.write_cached(&key, &snapshot, self.policy.forecast_ttl)
            .await;
        Ok(snapshot)
    }

    async fn read_cached<T: DeserializeOwned>(&self, key: &WeatherCacheKey) -> Option<T> {
        let payload = match self.cache.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(key = %key, "weather cache miss");
                return None;
            }
            Err(error) => {
                warn!(key = %key, %error, "weather cache read failed; treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!(key = %key, "weather cache hit");
                Some(value)
            }
            Err(error) => {
                warn!(key = %key, %error, "cached weather entry undecodable; treating as miss");
                None
            }
        }
    }

    async fn write_cached<T: Serialize>(&self, key: &WeatherCacheKey, value: &T, ttl: CacheTtl) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(key = %key, %error, "failed to serialise weather snapshot for caching");
                return;
            }
        };

        if let Err(error) = self.cache.set(key, &payload, ttl).await {
            warn!(key = %key, %error, "weather cache write failed");
        }
    }
}

#[cfg(test)]
#[path = "weather_service_tests.rs"]
mod tests;
