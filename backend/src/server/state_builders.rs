//! Adapter selection and service wiring.
//!
//! The OpenWeather key is mandatory. Redis and PostgreSQL have in-process
//! fallbacks so the gateway starts without them; each fallback is logged at
//! `warn`.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultClock;
use tracing::{info, warn};

use weather_gateway::domain::ports::{
    FavouriteLocationRepository, FixtureFavouriteLocationRepository,
    FixtureUserAccountRepository, UserAccountRepository, WeatherCache, WeatherSource,
};
use weather_gateway::domain::{
    AccountService, FavouriteForecastRefresher, FavouriteForecastRefresherPorts,
    FavouriteLocationsService, WeatherCachePolicy, WeatherService,
};
use weather_gateway::inbound::http::state::HttpState;
use weather_gateway::outbound::cache::{InMemoryWeatherCache, RedisWeatherCache};
use weather_gateway::outbound::openweather::OpenWeatherHttpSource;
use weather_gateway::outbound::password::Argon2PasswordHasher;
use weather_gateway::outbound::persistence::{
    DbPool, DieselFavouriteLocationRepository, DieselUserAccountRepository, PoolConfig,
};
use weather_gateway::settings::GatewaySettings;

const REDIS_POOL_SIZE: u32 = 16;

/// Adapters chosen for the configured infrastructure.
pub struct Adapters {
    pub cache: Arc<dyn WeatherCache>,
    pub source: Arc<dyn WeatherSource>,
    pub favourites: Arc<dyn FavouriteLocationRepository>,
    pub accounts: Arc<dyn UserAccountRepository>,
}

async fn build_cache(settings: &GatewaySettings) -> Result<Arc<dyn WeatherCache>> {
    match settings.redis_url.as_deref() {
        Some(url) => {
            let cache = RedisWeatherCache::connect(url, REDIS_POOL_SIZE)
                .await
                .wrap_err("failed to create Redis pool")?;
            info!("using Redis weather cache");
            Ok(Arc::new(cache))
        }
        None => {
            warn!("WEATHER_REDIS_URL not set; using in-memory weather cache");
            Ok(Arc::new(InMemoryWeatherCache::new(Arc::new(DefaultClock))))
        }
    }
}

fn build_source(settings: &GatewaySettings) -> Result<Arc<dyn WeatherSource>> {
    let config = settings.openweather()?;
    info!(base_url = %config.base_url, "using OpenWeather source");
    let source =
        OpenWeatherHttpSource::new(config).wrap_err("failed to build OpenWeather client")?;
    Ok(Arc::new(source))
}

/// Favourites and accounts share one pool.
async fn build_stores(
    settings: &GatewaySettings,
) -> Result<(
    Arc<dyn FavouriteLocationRepository>,
    Arc<dyn UserAccountRepository>,
)> {
    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("failed to create database pool")?;
            info!("using PostgreSQL favourites and account store");
            Ok((
                Arc::new(DieselFavouriteLocationRepository::new(pool.clone())),
                Arc::new(DieselUserAccountRepository::new(pool)),
            ))
        }
        None => {
            warn!("WEATHER_DATABASE_URL not set; favourites and accounts are unavailable");
            Ok((
                Arc::new(FixtureFavouriteLocationRepository),
                Arc::new(FixtureUserAccountRepository),
            ))
        }
    }
}

pub async fn build_adapters(settings: &GatewaySettings) -> Result<Adapters> {
    let source = build_source(settings)?;
    let (favourites, accounts) = build_stores(settings).await?;
    Ok(Adapters {
        cache: build_cache(settings).await?,
        source,
        favourites,
        accounts,
    })
}

/// HTTP state plus the refresher sharing the same weather service.
pub fn build_services(
    adapters: Adapters,
    policy: WeatherCachePolicy,
) -> (HttpState, Arc<FavouriteForecastRefresher>) {
    let Adapters {
        cache,
        source,
        favourites,
        accounts,
    } = adapters;
    let weather = Arc::new(WeatherService::new(cache.clone(), source, policy));
    let refresher = FavouriteForecastRefresher::new(
        FavouriteForecastRefresherPorts {
            weather: weather.clone(),
            favourites: favourites.clone(),
            cache,
        },
        policy,
    );
    let http_state = HttpState::new(
        weather,
        Arc::new(FavouriteLocationsService::new(favourites)),
        Arc::new(AccountService::new(
            accounts,
            Arc::new(Argon2PasswordHasher::default()),
        )),
    );
    (http_state, Arc::new(refresher))
}
