use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::{Genre, Movie, MovieFilter, Rating, User, WatchlistEntry};

use super::{MovieRelations, Result};

/// Repository for movie operations.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Gets a movie by its ID, loading the requested associations.
    async fn get_movie(&self, id: i64, relations: MovieRelations) -> Result<Option<Movie>>;

    /// Returns one page of movies matching `filter` and the total match count.
    ///
    /// The filter is expected to be normalized.
    async fn list_movies(
        &self,
        filter: &MovieFilter,
        relations: MovieRelations,
    ) -> Result<(Vec<Movie>, u64)>;

    /// Creates a new movie together with its genre associations.
    async fn create_movie(&self, movie: &Movie) -> Result<()>;

    /// Updates an existing movie, replacing its genre associations.
    async fn update_movie(&self, movie: &Movie) -> Result<()>;

    /// Deletes a movie and everything that references it.
    async fn delete_movie(&self, id: i64) -> Result<()>;
}

/// Repository for genre operations.
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// Gets all genres ordered by name.
    async fn list_genres(&self) -> Result<Vec<Genre>>;

    /// Gets the genres whose IDs appear in `ids`. Unknown IDs are skipped.
    async fn get_genres_by_ids(&self, ids: &[i64]) -> Result<Vec<Genre>>;

    /// Creates a new genre.
    async fn create_genre(&self, genre: &Genre) -> Result<()>;
}

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Creates a new user. Username and email must be unique.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Deletes a user along with their ratings and watchlist.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// Repository for rating operations.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Gets the rating a user gave a movie.
    async fn get_rating(&self, user_id: Uuid, movie_id: i64) -> Result<Option<Rating>>;

    /// Gets all ratings of a movie, newest first.
    async fn get_ratings_by_movie(&self, movie_id: i64) -> Result<Vec<Rating>>;

    /// Gets all ratings by a user, newest first.
    async fn get_ratings_by_user(&self, user_id: Uuid) -> Result<Vec<Rating>>;

    /// Creates a new rating.
    ///
    /// Fails with `AlreadyExists` if the user already rated the movie.
    async fn create_rating(&self, rating: &Rating) -> Result<()>;

    /// Updates an existing rating's value.
    async fn update_rating(&self, rating: &Rating) -> Result<()>;

    /// Deletes the rating a user gave a movie.
    async fn delete_rating(&self, user_id: Uuid, movie_id: i64) -> Result<()>;
}

/// Repository for watchlist operations.
#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// Gets a user's watchlist entry for a movie.
    async fn get_watchlist_entry(
        &self,
        user_id: Uuid,
        movie_id: i64,
    ) -> Result<Option<WatchlistEntry>>;

    /// Gets a user's watchlist, newest first, each entry with its movie and
    /// the movie's genres.
    async fn get_watchlist(&self, user_id: Uuid, favorites_only: bool)
        -> Result<Vec<WatchlistEntry>>;

    /// Creates a new watchlist entry.
    ///
    /// Fails with `AlreadyExists` if the movie is already on the watchlist.
    async fn create_watchlist_entry(&self, entry: &WatchlistEntry) -> Result<()>;

    /// Updates an existing entry.
    async fn update_watchlist_entry(&self, entry: &WatchlistEntry) -> Result<()>;

    /// Removes a movie from a user's watchlist.
    async fn delete_watchlist_entry(&self, user_id: Uuid, movie_id: i64) -> Result<()>;
}

/// A backend that stores the whole catalog.
pub trait CatalogStore:
    MovieRepository + GenreRepository + UserRepository + RatingRepository + WatchlistRepository
{
}

impl<T> CatalogStore for T where
    T: MovieRepository + GenreRepository + UserRepository + RatingRepository + WatchlistRepository
{
}
