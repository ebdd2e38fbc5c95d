//! Port for the key-value store holding serialised weather snapshots.
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CacheTtl, WeatherCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by cache adapters.
    pub enum WeatherCacheError {
        /// Cache backend is unavailable, timing out or rejected the command.
        Backend { message: String } => "weather cache backend failure: {message}",
    }
}

/// String key-value store with per-entry expiry owned by the backend.
///
/// Entries are opaque text; expiry bookkeeping lives entirely in the
/// implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherCache: Send + Sync {
    /// Read the payload stored under `key`, if any and not yet expired.
    async fn get(&self, key: &WeatherCacheKey) -> Result<Option<String>, WeatherCacheError>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set(
        &self,
        key: &WeatherCacheKey,
        value: &str,
        ttl: CacheTtl,
    ) -> Result<(), WeatherCacheError>;
}

/// Cache fixture that remembers writes and never expires them.
#[derive(Debug, Default)]
pub struct FixtureWeatherCache {
    entries: Mutex<HashMap<String, (String, CacheTtl)>>,
}

impl FixtureWeatherCache {
    /// Return the payload and TTL last written under `key`.
    pub fn entry(&self, key: &str) -> Option<(String, CacheTtl)> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

#[async_trait]
impl WeatherCache for FixtureWeatherCache {
    async fn get(&self, key: &WeatherCacheKey) -> Result<Option<String>, WeatherCacheError> {
        let entries = self
            .entries
            .lock()
            .map_err(|err| WeatherCacheError::backend(err.to_string()))?;
        Ok(entries.get(key.as_str()).map(|(value, _)| value.clone()))
    }

    async fn set(
        &self,
        key: &WeatherCacheKey,
        value: &str,
        ttl: CacheTtl,
    ) -> Result<(), WeatherCacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| WeatherCacheError::backend(err.to_string()))?;
        entries.insert(key.as_str().to_owned(), (value.to_owned(), ttl));
        Ok(())
    }
}
