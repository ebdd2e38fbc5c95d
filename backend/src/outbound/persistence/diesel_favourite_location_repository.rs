//! PostgreSQL-backed `FavouriteLocationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FavouriteLocationRepository, FavouriteLocationRepositoryError};
use crate::domain::{City, FavouriteLocation, UserId};

use super::diesel_error_mapping::{self, DieselErrorKinds};
use super::models::{FavouriteLocationRow, NewFavouriteLocationRow};
use super::pool::{DbPool, PoolError};
use super::schema::favourite_locations;

/// Diesel-backed implementation of the `FavouriteLocationRepository` port.
#[derive(Clone)]
pub struct DieselFavouriteLocationRepository {
    pool: DbPool,
}

impl DieselFavouriteLocationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FavouriteLocationRepositoryError {
    diesel_error_mapping::map_pool_error(error, FavouriteLocationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FavouriteLocationRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        DieselErrorKinds {
            query: FavouriteLocationRepositoryError::query,
            connection: FavouriteLocationRepositoryError::connection,
            duplicate: FavouriteLocationRepositoryError::duplicate,
        },
    )
}

fn row_to_location(
    row: FavouriteLocationRow,
) -> Result<FavouriteLocation, FavouriteLocationRepositoryError> {
    let city = City::new(row.city).map_err(|err| {
        FavouriteLocationRepositoryError::query(format!("invalid city in database: {err}"))
    })?;
    Ok(FavouriteLocation {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        city,
        created_at: row.created_at,
    })
}

#[async_trait]
impl FavouriteLocationRepository for DieselFavouriteLocationRepository {
    async fn insert(
        &self,
        user: &UserId,
        city: &City,
    ) -> Result<FavouriteLocation, FavouriteLocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewFavouriteLocationRow {
            user_id: *user.as_uuid(),
            city: city.as_str(),
        };

        let row: FavouriteLocationRow = diesel::insert_into(favourite_locations::table)
            .values(&new_row)
            .returning(FavouriteLocationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_location(row)
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<FavouriteLocation>, FavouriteLocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FavouriteLocationRow> = favourite_locations::table
            .filter(favourite_locations::user_id.eq(user.as_uuid()))
            .order((
                favourite_locations::created_at.desc(),
                favourite_locations::id.desc(),
            ))
            .select(FavouriteLocationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_location).collect()
    }

    async fn delete(
        &self,
        user: &UserId,
        id: i64,
    ) -> Result<bool, FavouriteLocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            favourite_locations::table
                .filter(favourite_locations::id.eq(id))
                .filter(favourite_locations::user_id.eq(user.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn list_distinct_cities(&self) -> Result<Vec<String>, FavouriteLocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        favourite_locations::table
            .select(favourite_locations::city)
            .distinct()
            .order(favourite_locations::city.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
