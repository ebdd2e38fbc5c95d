//! Users' favourite locations.
//!
//! The favourites store is also the source of the cities the forecast
//! refresher keeps warm.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use super::ports::{FavouriteLocationRepository, FavouriteLocationRepositoryError};
use super::{City, Error, UserId};

/// A city bookmarked by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteLocation {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: UserId,
    #[schema(value_type = String, example = "Lisbon")]
    pub city: City,
    pub created_at: DateTime<Utc>,
}

/// Application service for managing favourites.
pub struct FavouriteLocationsService {
    repository: Arc<dyn FavouriteLocationRepository>,
}

impl FavouriteLocationsService {
    pub fn new(repository: Arc<dyn FavouriteLocationRepository>) -> Self {
        Self { repository }
    }

    /// Bookmark `city` for `user`.
    pub async fn add(&self, user: &UserId, city: &City) -> Result<FavouriteLocation, Error> {
        self.repository
            .insert(user, city)
            .await
            .map_err(|err| match err {
                FavouriteLocationRepositoryError::Duplicate => {
                    Error::conflict("Location already exists in favorites")
                }
                other => map_repository_error(other, "Could not add location"),
            })
    }

    /// The user's favourites, newest first.
    pub async fn list(&self, user: &UserId) -> Result<Vec<FavouriteLocation>, Error> {
        self.repository
            .list_for_user(user)
            .await
            .map_err(|err| map_repository_error(err, "Could not fetch locations"))
    }

    /// Remove one favourite owned by `user`.
    pub async fn remove(&self, user: &UserId, id: i64) -> Result<(), Error> {
        let deleted = self
            .repository
            .delete(user, id)
            .await
            .map_err(|err| map_repository_error(err, "Could not delete location"))?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("Location not found in favorites"))
        }
    }
}

fn map_repository_error(err: FavouriteLocationRepositoryError, message: &str) -> Error {
    error!(error = %err, "favourite location repository failure");
    match err {
        FavouriteLocationRepositoryError::Connection { .. } => Error::service_unavailable(message),
        _ => Error::internal(message),
    }
}
