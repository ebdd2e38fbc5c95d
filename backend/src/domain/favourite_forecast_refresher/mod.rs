//! Periodic refresh of forecasts for every favourited city.
//!
//! Each run lists the distinct cities in the favourites store and
//! force-refreshes their forecasts one after another. A failure listing the
//! cities aborts the run; a failure for one city is logged, recorded in the
//! [`RefreshReport`] and never stops the remaining cities.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::ports::{
    FavouriteLocationRepository, FavouriteLocationRepositoryError, WeatherCache, WeatherCacheKey,
};
use crate::domain::{City, ForecastOptions, WeatherCachePolicy, WeatherService};

mod schedule;

pub use schedule::{DEFAULT_REFRESH_INTERVAL, RefreshSchedule, RefreshScheduleError, run_refresh_schedule};

/// Port bundle required by the refresher.
pub struct FavouriteForecastRefresherPorts {
    /// Read-through weather service used in force-refresh mode.
    pub weather: Arc<WeatherService>,
    /// Source of the distinct favourited cities.
    pub favourites: Arc<dyn FavouriteLocationRepository>,
    /// Cache receiving the refresher's own forecast write.
    pub cache: Arc<dyn WeatherCache>,
}

/// Failure to refresh a single city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRefreshFailure {
    pub city: String,
    pub message: String,
}

/// Outcome of one refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Cities whose forecast was fetched and cached, in processing order.
    pub refreshed: Vec<String>,
    /// Cities that failed, in processing order.
    pub failures: Vec<CityRefreshFailure>,
}

impl RefreshReport {
    pub fn attempted(&self) -> usize {
        self.refreshed.len() + self.failures.len()
    }
}

/// Errors that abort a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("failed to list favourite cities: {0}")]
    ListCities(#[from] FavouriteLocationRepositoryError),
}

/// Keeps the forecast cache warm for favourited cities.
pub struct FavouriteForecastRefresher {
    weather: Arc<WeatherService>,
    favourites: Arc<dyn FavouriteLocationRepository>,
    cache: Arc<dyn WeatherCache>,
    policy: WeatherCachePolicy,
}

impl FavouriteForecastRefresher {
    pub fn new(ports: FavouriteForecastRefresherPorts, policy: WeatherCachePolicy) -> Self {
        let FavouriteForecastRefresherPorts {
            weather,
            favourites,
            cache,
        } = ports;
        Self {
            weather,
            favourites,
            cache,
            policy,
        }
    }

    /// Refresh every favourited city once, sequentially.
    ///
    /// Safe to repeat: a second run with the same favourites re-fetches and
    /// re-caches the same data.
    pub async fn run_once(&self) -> Result<RefreshReport, RefreshError> {
        let cities = self.favourites.list_distinct_cities().await.map_err(|err| {
            error!(error = %err, "forecast refresh aborted: could not list favourite cities");
            RefreshError::from(err)
        })?;
        info!(cities = cities.len(), "forecast refresh started");

        let mut report = RefreshReport::default();
        for raw in cities {
            match self.refresh_city(&raw).await {
                Ok(()) => report.refreshed.push(raw),
                Err(message) => {
                    warn!(city = %raw, error = %message, "forecast refresh failed for city");
                    report.failures.push(CityRefreshFailure { city: raw, message });
                }
            }
        }

        info!(
            refreshed = report.refreshed.len(),
            failed = report.failures.len(),
            "forecast refresh finished"
        );
        Ok(report)
    }

    async fn refresh_city(&self, raw: &str) -> Result<(), String> {
        let city = City::new(raw).map_err(|err| err.to_string())?;
        let forecast = self
            .weather
            .forecast(&city, ForecastOptions::force_refresh())
            .await
            .map_err(|err| err.to_string())?;

        let payload = serde_json::to_string(&forecast).map_err(|err| err.to_string())?;
        self.cache
            .set(
                &WeatherCacheKey::forecast(&city),
                &payload,
                self.policy.forecast_ttl,
            )
            .await
            .map_err(|err| err.to_string())
    }
}
