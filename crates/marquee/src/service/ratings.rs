//! Rating aggregator: one rating per (user, movie) pair.
//!
//! Rating mutations leave cached movie detail alone. A cached detail view can
//! show a stale average until its TTL runs out; read
//! [`RatingService::get_movie_ratings`] for a fresh one.

use std::sync::Arc;

use uuid::Uuid;

use marquee_core::catalog::{MovieRatings, Rating, RatingValue};
use marquee_core::storage::{MovieRelations, MovieRepository, RatingRepository, UserRepository};

use crate::error::{Result, ServiceError};

#[derive(Clone)]
pub struct RatingService {
    movies: Arc<dyn MovieRepository>,
    users: Arc<dyn UserRepository>,
    ratings: Arc<dyn RatingRepository>,
}

impl RatingService {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        users: Arc<dyn UserRepository>,
        ratings: Arc<dyn RatingRepository>,
    ) -> Self {
        Self {
            movies,
            users,
            ratings,
        }
    }

    /// Creates or updates the user's rating of a movie.
    ///
    /// Losing an insert race to a concurrent first rating of the same pair is
    /// retried once as an update. If the winning row is gone by then the
    /// call fails with `Conflict`.
    pub async fn rate(&self, user_id: Uuid, movie_id: i64, value: RatingValue) -> Result<Rating> {
        self.ensure_movie(movie_id).await?;
        self.ensure_user(user_id).await?;

        if let Some(existing) = self.ratings.get_rating(user_id, movie_id).await? {
            return self.update_existing(existing, value).await;
        }

        let rating = Rating::new(user_id, movie_id, value);
        match self.ratings.create_rating(&rating).await {
            Ok(()) => {
                tracing::debug!(%user_id, movie_id, value = %value, "Created rating");
                Ok(rating)
            }
            Err(err) if err.is_already_exists() => {
                tracing::debug!(
                    %user_id,
                    movie_id,
                    "Rating insert lost a race, retrying as update"
                );
                match self.ratings.get_rating(user_id, movie_id).await? {
                    Some(existing) => self.update_existing(existing, value).await,
                    None => Err(ServiceError::Conflict(format!(
                        "Rating for movie {movie_id} changed concurrently"
                    ))),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns every rating of a movie, newest first, with their average.
    pub async fn get_movie_ratings(&self, movie_id: i64) -> Result<MovieRatings> {
        self.ensure_movie(movie_id).await?;

        let ratings = self.ratings.get_ratings_by_movie(movie_id).await?;
        Ok(MovieRatings::from_ratings(movie_id, ratings))
    }

    /// Returns the user's rating of a movie, if any.
    pub async fn get_user_rating(&self, user_id: Uuid, movie_id: i64) -> Result<Option<Rating>> {
        Ok(self.ratings.get_rating(user_id, movie_id).await?)
    }

    /// Returns every rating the user gave, newest first.
    pub async fn get_user_ratings(&self, user_id: Uuid) -> Result<Vec<Rating>> {
        Ok(self.ratings.get_ratings_by_user(user_id).await?)
    }

    pub async fn delete_rating(&self, user_id: Uuid, movie_id: i64) -> Result<()> {
        self.ratings.delete_rating(user_id, movie_id).await?;
        tracing::debug!(%user_id, movie_id, "Deleted rating");
        Ok(())
    }

    async fn update_existing(&self, existing: Rating, value: RatingValue) -> Result<Rating> {
        let updated = existing.with_value(value);
        self.ratings.update_rating(&updated).await?;
        tracing::debug!(
            user_id = %updated.user_id,
            movie_id = updated.movie_id,
            value = %value,
            "Updated rating"
        );
        Ok(updated)
    }

    async fn ensure_movie(&self, movie_id: i64) -> Result<()> {
        match self.movies.get_movie(movie_id, MovieRelations::NONE).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("Movie", movie_id)),
        }
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<()> {
        match self.users.get_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("User", user_id)),
        }
    }
}
