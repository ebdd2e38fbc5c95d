//! Process-local cache used when no Redis URL is configured.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{CacheTtl, WeatherCache, WeatherCacheError, WeatherCacheKey};

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-memory [`WeatherCache`] with expiry measured on an injected clock.
///
/// Expired entries are dropped when read and swept on every write, so keys
/// that are never read again do not accumulate.
pub struct InMemoryWeatherCache {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryWeatherCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, WeatherCacheError> {
        self.entries
            .lock()
            .map_err(|_| WeatherCacheError::backend("in-memory cache lock poisoned"))
    }
}

#[async_trait]
impl WeatherCache for InMemoryWeatherCache {
    async fn get(&self, key: &WeatherCacheKey) -> Result<Option<String>, WeatherCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key.as_str()) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &WeatherCacheKey,
        value: &str,
        ttl: CacheTtl,
    ) -> Result<(), WeatherCacheError> {
        let lifetime = TimeDelta::from_std(ttl.as_duration())
            .map_err(|err| WeatherCacheError::backend(format!("ttl out of range: {err}")))?;
        let now = self.clock.utc();
        let expires_at = now + lifetime;
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.as_str().to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }
}
