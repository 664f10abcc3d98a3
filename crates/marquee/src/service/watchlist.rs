//! Watchlist manager: one entry per (user, movie) pair.

use std::sync::Arc;

use uuid::Uuid;

use marquee_core::catalog::{AddToWatchlistRequest, WatchlistEntry};
use marquee_core::storage::{
    MovieRelations, MovieRepository, UserRepository, WatchlistRepository,
};

use crate::error::{Result, ServiceError};

#[derive(Clone)]
pub struct WatchlistService {
    movies: Arc<dyn MovieRepository>,
    users: Arc<dyn UserRepository>,
    watchlist: Arc<dyn WatchlistRepository>,
}

impl WatchlistService {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        users: Arc<dyn UserRepository>,
        watchlist: Arc<dyn WatchlistRepository>,
    ) -> Self {
        Self {
            movies,
            users,
            watchlist,
        }
    }

    /// Adds a movie to the user's watchlist.
    ///
    /// Fails with `Conflict` when the movie is already on it.
    pub async fn add(
        &self,
        user_id: Uuid,
        movie_id: i64,
        request: AddToWatchlistRequest,
    ) -> Result<WatchlistEntry> {
        if self
            .movies
            .get_movie(movie_id, MovieRelations::NONE)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Movie", movie_id));
        }
        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::not_found("User", user_id));
        }
        if self.is_member(user_id, movie_id).await? {
            return Err(ServiceError::Conflict(format!(
                "Movie {movie_id} is already on the watchlist"
            )));
        }

        // A concurrent add that slips past the check above still hits the
        // unique constraint and surfaces as Conflict.
        let entry = WatchlistEntry::new(user_id, movie_id, request.is_favorite);
        self.watchlist.create_watchlist_entry(&entry).await?;
        tracing::debug!(%user_id, movie_id, is_favorite = entry.is_favorite, "Added to watchlist");

        Ok(entry)
    }

    /// Returns the user's entries newest first, each with its movie.
    pub async fn list(&self, user_id: Uuid, favorites_only: bool) -> Result<Vec<WatchlistEntry>> {
        Ok(self.watchlist.get_watchlist(user_id, favorites_only).await?)
    }

    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<WatchlistEntry>> {
        self.list(user_id, true).await
    }

    pub async fn remove(&self, user_id: Uuid, movie_id: i64) -> Result<()> {
        self.watchlist
            .delete_watchlist_entry(user_id, movie_id)
            .await?;
        tracing::debug!(%user_id, movie_id, "Removed from watchlist");
        Ok(())
    }

    /// Flips the favorite flag of an entry and returns the updated entry.
    pub async fn toggle_favorite(&self, user_id: Uuid, movie_id: i64) -> Result<WatchlistEntry> {
        let entry = self
            .watchlist
            .get_watchlist_entry(user_id, movie_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found("WatchlistEntry", format!("{user_id}/{movie_id}"))
            })?
            .toggled();

        self.watchlist.update_watchlist_entry(&entry).await?;
        tracing::debug!(%user_id, movie_id, is_favorite = entry.is_favorite, "Toggled favorite");

        Ok(entry)
    }

    pub async fn is_member(&self, user_id: Uuid, movie_id: i64) -> Result<bool> {
        Ok(self
            .watchlist
            .get_watchlist_entry(user_id, movie_id)
            .await?
            .is_some())
    }
}
