//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only reach the domain services.

use std::sync::Arc;

use crate::domain::{AccountService, FavouriteLocationsService, WeatherService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub weather: Arc<WeatherService>,
    pub favourites: Arc<FavouriteLocationsService>,
    pub accounts: Arc<AccountService>,
}

impl HttpState {
    pub fn new(
        weather: Arc<WeatherService>,
        favourites: Arc<FavouriteLocationsService>,
        accounts: Arc<AccountService>,
    ) -> Self {
        Self {
            weather,
            favourites,
            accounts,
        }
    }
}
