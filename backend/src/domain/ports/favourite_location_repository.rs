//! Port abstraction for persisting users' favourite locations.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{City, FavouriteLocation, UserId};

define_port_error! {
    /// Persistence errors raised by favourite location adapters.
    pub enum FavouriteLocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "favourite location repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "favourite location repository query failed: {message}",
        /// The user already bookmarked this city.
        Duplicate => "favourite location already exists",
    }
}

/// Port for storing and enumerating favourite locations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavouriteLocationRepository: Send + Sync {
    /// Bookmark `city` for `user`; fails with `Duplicate` when it already is.
    async fn insert(
        &self,
        user: &UserId,
        city: &City,
    ) -> Result<FavouriteLocation, FavouriteLocationRepositoryError>;

    /// List the user's favourites, newest first.
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<FavouriteLocation>, FavouriteLocationRepositoryError>;

    /// Delete one favourite owned by `user`. Returns `false` when nothing matched.
    async fn delete(&self, user: &UserId, id: i64)
    -> Result<bool, FavouriteLocationRepositoryError>;

    /// Every distinct city bookmarked by any user, as stored.
    async fn list_distinct_cities(&self) -> Result<Vec<String>, FavouriteLocationRepositoryError>;
}

/// Fixture repository holding no favourites and accepting no writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureFavouriteLocationRepository;

#[async_trait]
impl FavouriteLocationRepository for FixtureFavouriteLocationRepository {
    async fn insert(
        &self,
        _user: &UserId,
        _city: &City,
    ) -> Result<FavouriteLocation, FavouriteLocationRepositoryError> {
        Err(FavouriteLocationRepositoryError::connection(
            "no favourites store configured",
        ))
    }

    async fn list_for_user(
        &self,
        _user: &UserId,
    ) -> Result<Vec<FavouriteLocation>, FavouriteLocationRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(
        &self,
        _user: &UserId,
        _id: i64,
    ) -> Result<bool, FavouriteLocationRepositoryError> {
        Ok(false)
    }

    async fn list_distinct_cities(&self) -> Result<Vec<String>, FavouriteLocationRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_is_empty_and_read_only() {
        let repo = FixtureFavouriteLocationRepository;
        let user = UserId::random();
        let city = City::new("Paris").expect("valid city");

        assert!(repo.list_for_user(&user).await.expect("list").is_empty());
        assert!(repo.list_distinct_cities().await.expect("cities").is_empty());
        assert!(!repo.delete(&user, 7).await.expect("delete"));
        assert!(matches!(
            repo.insert(&user, &city).await,
            Err(FavouriteLocationRepositoryError::Connection { .. })
        ));
    }
}
