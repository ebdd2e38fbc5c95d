//! Cache keys and TTLs shared by weather cache adapters.
use std::time::Duration;

use crate::domain::City;

/// Disjoint key spaces held in the weather cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Current conditions for a city.
    Weather,
    /// Multi-day forecast for a city.
    Forecast,
}

impl CacheNamespace {
    fn prefix(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Forecast => "forecast",
        }
    }
}

/// Key under which a serialised snapshot is stored.
///
/// Rendered as `<namespace>_<city>` with the city string untouched, so keys are
/// case-sensitive.
///
/// # Examples
/// ```
/// use weather_gateway::domain::City;
/// use weather_gateway::domain::ports::WeatherCacheKey;
///
/// let city = City::new("Paris").expect("valid city");
/// assert_eq!(WeatherCacheKey::current(&city).as_str(), "weather_Paris");
/// assert_eq!(WeatherCacheKey::forecast(&city).as_str(), "forecast_Paris");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeatherCacheKey {
    namespace: CacheNamespace,
    rendered: String,
}

impl WeatherCacheKey {
    pub fn new(namespace: CacheNamespace, city: &City) -> Self {
        Self {
            namespace,
            rendered: format!("{}_{}", namespace.prefix(), city.as_str()),
        }
    }

    /// Key for the current-weather entry of `city`.
    pub fn current(city: &City) -> Self {
        Self::new(CacheNamespace::Weather, city)
    }

    /// Key for the forecast entry of `city`.
    pub fn forecast(city: &City) -> Self {
        Self::new(CacheNamespace::Forecast, city)
    }

    pub fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    pub fn as_str(&self) -> &str {
        self.rendered.as_str()
    }
}

impl std::fmt::Display for WeatherCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for WeatherCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Time-to-live for a cache entry, expressed in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheTtl {
    minutes: u64,
}

impl CacheTtl {
    pub const fn from_minutes(minutes: u64) -> Self {
        Self { minutes }
    }

    pub const fn minutes(self) -> u64 {
        self.minutes
    }

    /// Milliseconds, the unit most key-value backends expect.
    pub const fn as_millis(self) -> u64 {
        self.minutes.saturating_mul(60_000)
    }

    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.minutes.saturating_mul(60))
    }
}
