//! Domain primitives, services and ports.
//!
//! Purpose: define the weather gateway's strongly typed model and the
//! services that orchestrate the cache, the upstream provider and the
//! favourites store. Adapters live in `outbound` and `inbound`.
//!
//! Public surface:
//! - `City` — validated city name used as the lookup key everywhere.
//! - `WeatherService` — read-through cache for current weather and forecasts.
//! - `FavouriteForecastRefresher` — periodic force-refresh of favourite cities.
//! - `FavouriteLocationsService` — bookmark management per user.
//! - `AccountService` — signup and password login for those users.
//! - `Error` / `ErrorCode` — transport-agnostic error payload.

pub mod accounts;
pub mod auth;
pub mod city;
pub mod error;
pub mod favourite_forecast_refresher;
pub mod favourites;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod weather;
pub mod weather_service;

pub use self::accounts::{AccountProfile, AccountService};
pub use self::auth::{
    CredentialsValidationError, EmailAddress, LoginCredentials, PASSWORD_MIN_CHARS, Password,
    SignupDetails,
};
pub use self::city::{CITY_MAX_CHARS, CITY_MIN_CHARS, City, CityValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::favourite_forecast_refresher::{
    CityRefreshFailure, DEFAULT_REFRESH_INTERVAL, FavouriteForecastRefresher,
    FavouriteForecastRefresherPorts, RefreshError, RefreshReport, RefreshSchedule,
    RefreshScheduleError, run_refresh_schedule,
};
pub use self::favourites::{FavouriteLocation, FavouriteLocationsService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdValidationError};
pub use self::weather::{
    Clouds, Coordinates, ForecastCity, ForecastItem, ForecastSnapshot, ForecastSystem,
    MainReadings, WeatherCondition, WeatherSnapshot, WeatherSystem, Wind,
};
pub use self::weather_service::{
    DEFAULT_CURRENT_TTL, DEFAULT_FORECAST_TTL, ForecastOptions, WeatherCachePolicy,
    WeatherService,
};
