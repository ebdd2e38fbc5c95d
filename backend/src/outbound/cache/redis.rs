//! Redis-backed weather cache.
//!
//! Entries are plain strings written with `SET key value PX <ms>`, so expiry
//! is handled entirely by Redis.

use async_trait::async_trait;
use bb8_redis::{RedisConnectionManager, bb8, redis};
use tracing::debug;

use crate::domain::ports::{CacheTtl, WeatherCache, WeatherCacheError, WeatherCacheKey};

/// Connection pool for Redis.
pub type RedisPool = bb8::Pool<RedisConnectionManager>;

/// [`WeatherCache`] adapter over a bb8 Redis pool.
#[derive(Clone)]
pub struct RedisWeatherCache {
    pool: RedisPool,
}

impl RedisWeatherCache {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Build a pool for `url` with at most `max_size` connections.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherCacheError::Backend`] when the URL is invalid or the
    /// pool cannot be created.
    pub async fn connect(url: &str, max_size: u32) -> Result<Self, WeatherCacheError> {
        let manager = RedisConnectionManager::new(url).map_err(map_redis_error)?;
        let pool = bb8::Pool::builder()
            .max_size(max_size)
            .build(manager)
            .await
            .map_err(map_redis_error)?;
        Ok(Self::new(pool))
    }

    async fn connection(
        &self,
    ) -> Result<bb8::PooledConnection<'_, RedisConnectionManager>, WeatherCacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| WeatherCacheError::backend(err.to_string()))
    }
}

#[async_trait]
impl WeatherCache for RedisWeatherCache {
    async fn get(&self, key: &WeatherCacheKey) -> Result<Option<String>, WeatherCacheError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set(
        &self,
        key: &WeatherCacheKey,
        value: &str,
        ttl: CacheTtl,
    ) -> Result<(), WeatherCacheError> {
        let mut conn = self.connection().await?;
        let (): () = redis::cmd("SET")
            .arg(key.as_str())
            .arg(value)
            .arg("PX")
            .arg(ttl.as_millis())
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        debug!(key = %key, ttl_ms = ttl.as_millis(), "weather cache entry stored");
        Ok(())
    }
}

fn map_redis_error(err: redis::RedisError) -> WeatherCacheError {
    WeatherCacheError::backend(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_url_is_a_backend_error() {
        let result = RedisWeatherCache::connect("not a redis url", 4).await;
        assert!(matches!(result, Err(WeatherCacheError::Backend { .. })));
    }
}
