//! Query and mutation roots.
//!
//! Weather lookups are public. Favourite operations require the session's
//! user, exposed to resolvers as [`Viewer`].

use async_graphql::{Context, InputObject, Json, Object, SimpleObject};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{
    Error, FavouriteLocation, ForecastOptions, ForecastSnapshot, UserId, WeatherSnapshot,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{CITY_FIELD, parse_city};

use super::error::into_graphql_error;

/// The caller resolved from the session cookie, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer(pub Option<UserId>);

/// Argument shared by weather lookups and `favoriteLocation`.
#[derive(Debug, InputObject)]
#[graphql(name = "WeatherInput")]
pub struct CityInput {
    pub city: String,
}

/// A favourite as seen by its owner.
#[derive(Debug, SimpleObject)]
#[graphql(name = "Location")]
pub struct LocationObject {
    pub id: i64,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

impl From<FavouriteLocation> for LocationObject {
    fn from(location: FavouriteLocation) -> Self {
        Self {
            id: location.id,
            city: location.city.as_str().to_owned(),
            created_at: location.created_at,
        }
    }
}

fn state<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a HttpState> {
    ctx.data::<HttpState>()
}

fn require_viewer(ctx: &Context<'_>) -> async_graphql::Result<UserId> {
    ctx.data_opt::<Viewer>()
        .and_then(|viewer| viewer.0)
        .ok_or_else(|| into_graphql_error(&Error::unauthorized("login required")))
}

fn graphql_err(error: impl Into<Error>) -> async_graphql::Error {
    into_graphql_error(&error.into())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Current conditions for a city, read through the cache.
    #[graphql(name = "getWeather")]
    async fn weather(
        &self,
        ctx: &Context<'_>,
        input: CityInput,
    ) -> async_graphql::Result<Json<WeatherSnapshot>> {
        debug!(city = %input.city, "graphql weather lookup");
        let city = parse_city(input.city, CITY_FIELD).map_err(graphql_err)?;
        let snapshot = state(ctx)?
            .weather
            .current_weather(&city)
            .await
            .map_err(graphql_err)?;
        Ok(Json(snapshot))
    }

    /// Five-day forecast for a city, read through the cache.
    #[graphql(name = "getForecast")]
    async fn forecast(
        &self,
        ctx: &Context<'_>,
        input: CityInput,
    ) -> async_graphql::Result<Json<ForecastSnapshot>> {
        debug!(city = %input.city, "graphql forecast lookup");
        let city = parse_city(input.city, CITY_FIELD).map_err(graphql_err)?;
        let snapshot = state(ctx)?
            .weather
            .forecast(&city, ForecastOptions::default())
            .await
            .map_err(graphql_err)?;
        Ok(Json(snapshot))
    }

    /// The viewer's favourites, newest first.
    #[graphql(name = "getFavoriteLocations")]
    async fn favourite_locations(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<LocationObject>> {
        let user = require_viewer(ctx)?;
        let locations = state(ctx)?
            .favourites
            .list(&user)
            .await
            .map_err(graphql_err)?;
        Ok(locations.into_iter().map(LocationObject::from).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Bookmark a city for the viewer.
    #[graphql(name = "favoriteLocation")]
    async fn favourite_location(
        &self,
        ctx: &Context<'_>,
        input: CityInput,
    ) -> async_graphql::Result<String> {
        let user = require_viewer(ctx)?;
        let city = parse_city(input.city, CITY_FIELD).map_err(graphql_err)?;
        state(ctx)?
            .favourites
            .add(&user, &city)
            .await
            .map_err(graphql_err)?;
        Ok("Location added successfully to favorites".to_owned())
    }

    /// Remove one of the viewer's favourites.
    #[graphql(name = "deleteFavoriteLocation")]
    async fn delete_favourite_location(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<String> {
        let user = require_viewer(ctx)?;
        state(ctx)?
            .favourites
            .remove(&user, id)
            .await
            .map_err(graphql_err)?;
        Ok("Location deleted successfully".to_owned())
    }
}
