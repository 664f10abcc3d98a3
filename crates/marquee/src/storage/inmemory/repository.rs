//! In-memory repository implementation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use marquee_core::catalog::{
    Genre, Movie, MovieFilter, Rating, SortField, User, WatchlistEntry,
};
use marquee_core::storage::{
    GenreRepository, MovieRelations, MovieRepository, RatingRepository, RepositoryError, Result,
    UserRepository, WatchlistRepository,
};

/// In-memory storage backend.
///
/// Data is not persisted and will be lost when the last clone is dropped.
/// Locks are always taken in table declaration order.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    movies: Arc<RwLock<HashMap<i64, Movie>>>,
    genres: Arc<RwLock<HashMap<i64, Genre>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    ratings: Arc<RwLock<HashMap<(Uuid, i64), Rating>>>,
    watchlist: Arc<RwLock<HashMap<(Uuid, i64), WatchlistEntry>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(HashMap::new())),
            genres: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
            ratings: Arc::new(RwLock::new(HashMap::new())),
            watchlist: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Strips what the row itself does not hold.
fn stored_row(movie: &Movie) -> Movie {
    let mut row = movie.clone();
    row.genres.sort_by(|a, b| a.name.cmp(&b.name));
    row.ratings = Vec::new();
    row.average_rating = 0.0;
    row
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

/// Copies a stored movie, attaching only the requested associations.
fn with_relations(
    movie: &Movie,
    relations: MovieRelations,
    ratings: &HashMap<(Uuid, i64), Rating>,
) -> Movie {
    let mut movie = movie.clone();
    if !relations.genres {
        movie.genres = Vec::new();
    }
    if relations.ratings {
        let mut movie_ratings: Vec<Rating> = ratings
            .values()
            .filter(|r| r.movie_id == movie.id)
            .cloned()
            .collect();
        newest_first(&mut movie_ratings, |r| r.created_at);
        movie.ratings = movie_ratings;
    }
    movie
}

fn matches_filter(movie: &Movie, filter: &MovieFilter) -> bool {
    if let Some(search) = &filter.search {
        if !movie.title.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
    }
    filter.genre_ids.is_empty() || filter.genre_ids.iter().any(|id| movie.has_genre(*id))
}

/// Orders by the sort column, ties broken by ascending id.
fn compare_movies(a: &Movie, b: &Movie, filter: &MovieFilter) -> Ordering {
    let primary = match filter.sort_by {
        SortField::Title => a.title.cmp(&b.title),
        SortField::ReleaseDate => a.release_date.cmp(&b.release_date),
        SortField::VoteAverage => a.vote_average.total_cmp(&b.vote_average),
        SortField::Popularity => a.popularity.total_cmp(&b.popularity),
    };
    let primary = if filter.sort_order.is_ascending() {
        primary
    } else {
        primary.reverse()
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

fn ensure_references(
    movies: &HashMap<i64, Movie>,
    users: &HashMap<Uuid, User>,
    user_id: Uuid,
    movie_id: i64,
    entity_type: &str,
) -> Result<()> {
    if !users.contains_key(&user_id) || !movies.contains_key(&movie_id) {
        return Err(RepositoryError::InvalidData(format!(
            "Foreign key constraint violation for {entity_type}"
        )));
    }
    Ok(())
}

#[async_trait]
impl MovieRepository for InMemoryRepository {
    async fn get_movie(&self, id: i64, relations: MovieRelations) -> Result<Option<Movie>> {
        let movies = self.movies.read().await;
        let ratings = self.ratings.read().await;
        Ok(movies
            .get(&id)
            .map(|movie| with_relations(movie, relations, &ratings)))
    }

    async fn list_movies(
        &self,
        filter: &MovieFilter,
        relations: MovieRelations,
    ) -> Result<(Vec<Movie>, u64)> {
        let movies = self.movies.read().await;
        let ratings = self.ratings.read().await;

        let mut matching: Vec<&Movie> = movies
            .values()
            .filter(|movie| matches_filter(movie, filter))
            .collect();
        matching.sort_by(|a, b| compare_movies(a, b, filter));

        let total = matching.len() as u64;
        let skip = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(skip)
            .take(filter.limit.max(1) as usize)
            .map(|movie| with_relations(movie, relations, &ratings))
            .collect();

        Ok((page, total))
    }

    async fn create_movie(&self, movie: &Movie) -> Result<()> {
        let mut movies = self.movies.write().await;
        if movies.contains_key(&movie.id) {
            return Err(RepositoryError::already_exists("Movie", movie.id));
        }
        movies.insert(movie.id, stored_row(movie));
        Ok(())
    }

    async fn update_movie(&self, movie: &Movie) -> Result<()> {
        let mut movies = self.movies.write().await;
        if !movies.contains_key(&movie.id) {
            return Err(RepositoryError::not_found("Movie", movie.id));
        }
        movies.insert(movie.id, stored_row(movie));
        Ok(())
    }

    async fn delete_movie(&self, id: i64) -> Result<()> {
        let mut movies = self.movies.write().await;
        let mut ratings = self.ratings.write().await;
        let mut watchlist = self.watchlist.write().await;

        if movies.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Movie", id));
        }
        ratings.retain(|(_, movie_id), _| *movie_id != id);
        watchlist.retain(|(_, movie_id), _| *movie_id != id);
        Ok(())
    }
}

#[async_trait]
impl GenreRepository for InMemoryRepository {
    async fn list_genres(&self) -> Result<Vec<Genre>> {
        let genres = self.genres.read().await;
        let mut all: Vec<Genre> = genres.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn get_genres_by_ids(&self, ids: &[i64]) -> Result<Vec<Genre>> {
        let genres = self.genres.read().await;
        let mut found: Vec<Genre> = genres
            .values()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn create_genre(&self, genre: &Genre) -> Result<()> {
        let mut genres = self.genres.write().await;
        if genres.contains_key(&genre.id) {
            return Err(RepositoryError::already_exists("Genre", genre.id));
        }
        genres.insert(genre.id, genre.clone());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::already_exists("User", user.id));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::already_exists("User", &user.username));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::already_exists("User", &user.email));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        let mut ratings = self.ratings.write().await;
        let mut watchlist = self.watchlist.write().await;

        if users.remove(&id).is_none() {
            return Err(RepositoryError::not_found("User", id));
        }
        ratings.retain(|(user_id, _), _| *user_id != id);
        watchlist.retain(|(user_id, _), _| *user_id != id);
        Ok(())
    }
}

#[async_trait]
impl RatingRepository for InMemoryRepository {
    async fn get_rating(&self, user_id: Uuid, movie_id: i64) -> Result<Option<Rating>> {
        let ratings = self.ratings.read().await;
        Ok(ratings.get(&(user_id, movie_id)).cloned())
    }

    async fn get_ratings_by_movie(&self, movie_id: i64) -> Result<Vec<Rating>> {
        let ratings = self.ratings.read().await;
        let mut found: Vec<Rating> = ratings
            .values()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        newest_first(&mut found, |r| r.created_at);
        Ok(found)
    }

    async fn get_ratings_by_user(&self, user_id: Uuid) -> Result<Vec<Rating>> {
        let ratings = self.ratings.read().await;
        let mut found: Vec<Rating> = ratings
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut found, |r| r.created_at);
        Ok(found)
    }

    async fn create_rating(&self, rating: &Rating) -> Result<()> {
        let movies = self.movies.read().await;
        let users = self.users.read().await;
        let mut ratings = self.ratings.write().await;

        ensure_references(&movies, &users, rating.user_id, rating.movie_id, "Rating")?;

        let key = (rating.user_id, rating.movie_id);
        if ratings.contains_key(&key) {
            return Err(RepositoryError::already_exists(
                "Rating",
                format!("{}/{}", rating.user_id, rating.movie_id),
            ));
        }
        ratings.insert(key, rating.clone());
        Ok(())
    }

    async fn update_rating(&self, rating: &Rating) -> Result<()> {
        let mut ratings = self.ratings.write().await;
        match ratings.get_mut(&(rating.user_id, rating.movie_id)) {
            Some(existing) if existing.id == rating.id => {
                existing.value = rating.value;
                existing.updated_at = rating.updated_at;
                Ok(())
            }
            _ => Err(RepositoryError::not_found("Rating", rating.id)),
        }
    }

    async fn delete_rating(&self, user_id: Uuid, movie_id: i64) -> Result<()> {
        let mut ratings = self.ratings.write().await;
        if ratings.remove(&(user_id, movie_id)).is_none() {
            return Err(RepositoryError::not_found(
                "Rating",
                format!("{user_id}/{movie_id}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl WatchlistRepository for InMemoryRepository {
    async fn get_watchlist_entry(
        &self,
        user_id: Uuid,
        movie_id: i64,
    ) -> Result<Option<WatchlistEntry>> {
        let watchlist = self.watchlist.read().await;
        Ok(watchlist.get(&(user_id, movie_id)).cloned())
    }

    async fn get_watchlist(
        &self,
        user_id: Uuid,
        favorites_only: bool,
    ) -> Result<Vec<WatchlistEntry>> {
        let movies = self.movies.read().await;
        let watchlist = self.watchlist.read().await;

        let mut entries: Vec<WatchlistEntry> = watchlist
            .values()
            .filter(|e| e.user_id == user_id)
            .filter(|e| !favorites_only || e.is_favorite)
            .map(|e| {
                let mut entry = e.clone();
                entry.movie = movies.get(&e.movie_id).cloned();
                entry
            })
            .collect();
        newest_first(&mut entries, |e| e.created_at);
        Ok(entries)
    }

    async fn create_watchlist_entry(&self, entry: &WatchlistEntry) -> Result<()> {
        let movies = self.movies.read().await;
        let users = self.users.read().await;
        let mut watchlist = self.watchlist.write().await;

        ensure_references(&movies, &users, entry.user_id, entry.movie_id, "WatchlistEntry")?;

        let key = (entry.user_id, entry.movie_id);
        if watchlist.contains_key(&key) {
            return Err(RepositoryError::already_exists(
                "WatchlistEntry",
                format!("{}/{}", entry.user_id, entry.movie_id),
            ));
        }
        let mut stored = entry.clone();
        stored.movie = None;
        watchlist.insert(key, stored);
        Ok(())
    }

    async fn update_watchlist_entry(&self, entry: &WatchlistEntry) -> Result<()> {
        let mut watchlist = self.watchlist.write().await;
        match watchlist.get_mut(&(entry.user_id, entry.movie_id)) {
            Some(existing) if existing.id == entry.id => {
                existing.is_favorite = entry.is_favorite;
                Ok(())
            }
            _ => Err(RepositoryError::not_found("WatchlistEntry", entry.id)),
        }
    }

    async fn delete_watchlist_entry(&self, user_id: Uuid, movie_id: i64) -> Result<()> {
        let mut watchlist = self.watchlist.write().await;
        if watchlist.remove(&(user_id, movie_id)).is_none() {
            return Err(RepositoryError::not_found(
                "WatchlistEntry",
                format!("{user_id}/{movie_id}"),
            ));
        }
        Ok(())
    }
}
