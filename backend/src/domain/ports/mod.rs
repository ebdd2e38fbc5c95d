//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod favourite_location_repository;
mod password_hasher;
mod user_account_repository;
mod weather_cache;
mod weather_source;

pub use cache_key::{CacheNamespace, CacheTtl, WeatherCacheKey};
#[cfg(test)]
pub use favourite_location_repository::MockFavouriteLocationRepository;
pub use favourite_location_repository::{
    FavouriteLocationRepository, FavouriteLocationRepositoryError,
    FixtureFavouriteLocationRepository,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_account_repository::MockUserAccountRepository;
pub use user_account_repository::{
    FixtureUserAccountRepository, NewUserAccount, UserAccount, UserAccountRepository,
    UserAccountRepositoryError,
};
#[cfg(test)]
pub use weather_cache::MockWeatherCache;
pub use weather_cache::{FixtureWeatherCache, WeatherCache, WeatherCacheError};
#[cfg(test)]
pub use weather_source::MockWeatherSource;
pub use weather_source::{FixtureWeatherSource, WeatherSource, WeatherSourceError};
