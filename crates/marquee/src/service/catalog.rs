//! Catalog query engine: cache-aside reads and write invalidation for movies
//! and genres.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use marquee_core::cache::{
    movie_detail_key, movie_listing_key, DETAIL_TTL, GENRE_CATALOG_KEY, GENRE_CATALOG_TTL,
    LISTING_TTL, MOVIE_LISTING_PATTERN,
};
use marquee_core::catalog::{
    CreateMovieRequest, Genre, Movie, MovieFilter, MoviePage, UpdateMovieRequest,
};
use marquee_core::storage::{GenreRepository, MovieRelations, MovieRepository};

use crate::cache::CacheAccessor;
use crate::error::{Result, ServiceError};

/// How a movie mutation clears the listing cache space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidationStrategy {
    /// Delete only `movie-listing:*` keys.
    #[default]
    ListingPattern,
    /// Drop the whole cache, detail and genre entries included.
    FullReset,
}

impl FromStr for InvalidationStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pattern" | "listing-pattern" => Ok(InvalidationStrategy::ListingPattern),
            "reset" | "full-reset" => Ok(InvalidationStrategy::FullReset),
            other => Err(format!(
                "Invalid cache invalidation '{other}': expected pattern or reset"
            )),
        }
    }
}

/// Time-to-live of each cached view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub listing: Duration,
    pub detail: Duration,
    pub genres: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            listing: LISTING_TTL,
            detail: DETAIL_TTL,
            genres: GENRE_CATALOG_TTL,
        }
    }
}

/// Serves movie listings, movie detail and the genre catalog.
#[derive(Clone)]
pub struct CatalogService {
    movies: Arc<dyn MovieRepository>,
    genres: Arc<dyn GenreRepository>,
    cache: CacheAccessor,
    ttls: CacheTtls,
    invalidation: InvalidationStrategy,
}

impl CatalogService {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        genres: Arc<dyn GenreRepository>,
        cache: CacheAccessor,
    ) -> Self {
        Self {
            movies,
            genres,
            cache,
            ttls: CacheTtls::default(),
            invalidation: InvalidationStrategy::default(),
        }
    }

    pub fn with_ttls(mut self, ttls: CacheTtls) -> Self {
        self.ttls = ttls;
        self
    }

    pub fn with_invalidation(mut self, invalidation: InvalidationStrategy) -> Self {
        self.invalidation = invalidation;
        self
    }

    /// Returns one page of movies, each with its average rating.
    pub async fn list_movies(&self, filter: &MovieFilter) -> Result<MoviePage> {
        let filter = filter.normalized();
        let key = movie_listing_key(&filter);

        self.cache
            .get_or_populate(
                &key,
                || async {
                    let (movies, total) =
                        self.movies.list_movies(&filter, MovieRelations::ALL).await?;
                    let items = movies
                        .into_iter()
                        .map(Movie::with_average_rating)
                        .collect();
                    Ok::<_, ServiceError>(MoviePage::new(items, total, filter.page, filter.limit))
                },
                Some(self.ttls.listing),
            )
            .await
    }

    /// Returns a movie with genres, ratings and its average rating.
    pub async fn get_movie(&self, id: i64) -> Result<Movie> {
        let key = movie_detail_key(id);

        self.cache
            .get_or_populate(
                &key,
                || async {
                    self.movies
                        .get_movie(id, MovieRelations::ALL)
                        .await?
                        .map(Movie::with_average_rating)
                        .ok_or_else(|| ServiceError::not_found("Movie", id))
                },
                Some(self.ttls.detail),
            )
            .await
    }

    /// Adds a movie. Genre ids that do not resolve are dropped.
    pub async fn create_movie(&self, request: CreateMovieRequest) -> Result<Movie> {
        let genres = self.genres.get_genres_by_ids(&request.genre_ids).await?;
        let movie = Movie::from_request(request, genres);

        self.movies.create_movie(&movie).await?;
        tracing::debug!(movie_id = movie.id, title = %movie.title, "Created movie");

        self.invalidate_listings().await;
        Ok(movie)
    }

    /// Merges the supplied fields into an existing movie.
    pub async fn update_movie(&self, id: i64, update: UpdateMovieRequest) -> Result<Movie> {
        let existing = self
            .movies
            .get_movie(id, MovieRelations::ALL)
            .await?
            .ok_or_else(|| ServiceError::not_found("Movie", id))?;

        let genres = match update.replacement_genre_ids() {
            Some(ids) => Some(self.genres.get_genres_by_ids(ids).await?),
            None => None,
        };
        let movie = existing.apply_update(update, genres).with_average_rating();

        self.movies.update_movie(&movie).await?;
        tracing::debug!(movie_id = id, "Updated movie");

        self.invalidate_movie(id).await;
        Ok(movie)
    }

    /// Deletes a movie along with its ratings and watchlist entries.
    pub async fn delete_movie(&self, id: i64) -> Result<()> {
        self.movies.delete_movie(id).await?;
        tracing::debug!(movie_id = id, "Deleted movie");

        self.invalidate_movie(id).await;
        Ok(())
    }

    /// Returns every genre ordered by name.
    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.cache
            .get_or_populate(
                GENRE_CATALOG_KEY,
                || async { Ok::<_, ServiceError>(self.genres.list_genres().await?) },
                Some(self.ttls.genres),
            )
            .await
    }

    /// Adds a genre and drops the cached genre catalog.
    pub async fn create_genre(&self, genre: Genre) -> Result<Genre> {
        self.genres.create_genre(&genre).await?;
        tracing::debug!(genre_id = genre.id, name = %genre.name, "Created genre");

        self.cache.delete(GENRE_CATALOG_KEY).await;
        Ok(genre)
    }

    async fn invalidate_movie(&self, id: i64) {
        self.cache.delete(&movie_detail_key(id)).await;
        self.invalidate_listings().await;
    }

    async fn invalidate_listings(&self) {
        match self.invalidation {
            InvalidationStrategy::ListingPattern => {
                self.cache.invalidate_pattern(MOVIE_LISTING_PATTERN).await
            }
            InvalidationStrategy::FullReset => self.cache.reset_all().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::{FailingCache, RecordingCache};
    use crate::storage::InMemoryRepository;
    use marquee_core::catalog::{Rating, RatingValue, User};
    use marquee_core::storage::{RatingRepository, UserRepository};

    async fn setup(cache: Arc<RecordingCache>) -> (CatalogService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        for (id, name) in [(1, "Action"), (2, "Comedy"), (3, "Drama")] {
            repo.create_genre(&Genre::new(id, name)).await.unwrap();
        }
        let service = CatalogService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            CacheAccessor::new(cache),
        );
        (service, repo)
    }

    #[tokio::test]
    async fn test_create_get_delete_scenario() {
        let cache = Arc::new(RecordingCache::new());
        let (service, repo) = setup(cache).await;

        service
            .create_movie(CreateMovieRequest::new(42, "X").with_genre_ids([1]))
            .await
            .unwrap();

        let movie = service.get_movie(42).await.unwrap();
        assert_eq!(movie.title, "X");
        assert_eq!(movie.genres, vec![Genre::new(1, "Action")]);
        assert_eq!(movie.average_rating, 0.0);

        service.delete_movie(42).await.unwrap();
        assert_eq!(
            service.get_movie(42).await,
            Err(ServiceError::not_found("Movie", 42))
        );
        assert!(repo.get_ratings_by_movie(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_genre_ids_are_dropped() {
        let (service, _) = setup(Arc::new(RecordingCache::new())).await;

        let movie = service
            .create_movie(CreateMovieRequest::new(7, "Heat").with_genre_ids([3, 99]))
            .await
            .unwrap();

        assert_eq!(movie.genres, vec![Genre::new(3, "Drama")]);
    }

    #[tokio::test]
    async fn test_create_existing_movie_is_conflict() {
        let (service, _) = setup(Arc::new(RecordingCache::new())).await;
        service
            .create_movie(CreateMovieRequest::new(7, "Heat"))
            .await
            .unwrap();

        let result = service.create_movie(CreateMovieRequest::new(7, "Heat")).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_movie_is_served_from_cache() {
        let cache = Arc::new(RecordingCache::new());
        let (service, _) = setup(cache.clone()).await;
        service
            .create_movie(CreateMovieRequest::new(7, "Heat"))
            .await
            .unwrap();

        service.get_movie(7).await.unwrap();
        service.get_movie(7).await.unwrap();

        assert_eq!(cache.miss_count(), 1);
        assert_eq!(cache.hit_count(), 1);
        assert!(cache.contains("movie-detail:7").await);
    }

    #[tokio::test]
    async fn test_detail_includes_average_rating() {
        let (service, repo) = setup(Arc::new(RecordingCache::new())).await;
        service
            .create_movie(CreateMovieRequest::new(7, "Heat"))
            .await
            .unwrap();
        for (name, value) in [("a", 7.0), ("b", 8.0), ("c", 8.0)] {
            let user = User::new(name, format!("{name}@example.com"), "hash");
            repo.create_user(&user).await.unwrap();
            repo.create_rating(&Rating::new(user.id, 7, RatingValue::new(value).unwrap()))
                .await
                .unwrap();
        }

        let movie = service.get_movie(7).await.unwrap();

        assert_eq!(movie.ratings.len(), 3);
        assert_eq!(movie.average_rating, 7.7);
    }

    #[tokio::test]
    async fn test_list_movies_paginates() {
        let (service, _) = setup(Arc::new(RecordingCache::new())).await;
        for id in 1..=25 {
            service
                .create_movie(
                    CreateMovieRequest::new(id, format!("Movie {id}")).with_popularity(id as f64),
                )
                .await
                .unwrap();
        }

        let page = service
            .list_movies(&MovieFilter::default().with_page(2).with_limit(10))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn test_equivalent_filters_share_cached_listing() {
        let cache = Arc::new(RecordingCache::new());
        let (service, _) = setup(cache.clone()).await;

        service
            .list_movies(&MovieFilter::default().with_genre_ids([2, 1]))
            .await
            .unwrap();
        service
            .list_movies(&MovieFilter::default().with_genre_ids([1, 2, 2]))
            .await
            .unwrap();

        assert_eq!(cache.hit_count(), 1);
    }

    #[tokio::test]
    async fn test_mutation_invalidates_listing_pattern() {
        let cache = Arc::new(RecordingCache::new());
        let (service, _) = setup(cache.clone()).await;
        service.list_genres().await.unwrap();
        service.list_movies(&MovieFilter::default()).await.unwrap();

        service
            .create_movie(CreateMovieRequest::new(7, "Heat"))
            .await
            .unwrap();

        assert_eq!(cache.patterns_deleted().await, vec!["movie-listing:*"]);
        assert_eq!(cache.clear_count(), 0);
        assert!(cache.contains(GENRE_CATALOG_KEY).await);

        let page = service.list_movies(&MovieFilter::default()).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_full_reset_strategy_clears_everything() {
        let cache = Arc::new(RecordingCache::new());
        let (service, _) = setup(cache.clone()).await;
        let service = service.with_invalidation(InvalidationStrategy::FullReset);
        service.list_genres().await.unwrap();

        service
            .create_movie(CreateMovieRequest::new(7, "Heat"))
            .await
            .unwrap();

        assert_eq!(cache.clear_count(), 1);
        assert!(!cache.contains(GENRE_CATALOG_KEY).await);
    }

    #[tokio::test]
    async fn test_update_merges_and_invalidates_detail() {
        let cache = Arc::new(RecordingCache::new());
        let (service, _) = setup(cache.clone()).await;
        service
            .create_movie(CreateMovieRequest::new(7, "Heat").with_genre_ids([3]))
            .await
            .unwrap();
        service.get_movie(7).await.unwrap();

        let update = UpdateMovieRequest {
            overview: Some("A heist".to_string()),
            genre_ids: Some(vec![1, 3]),
            ..Default::default()
        };
        service.update_movie(7, update).await.unwrap();

        assert!(cache
            .keys_deleted()
            .await
            .contains(&"movie-detail:7".to_string()));
        let movie = service.get_movie(7).await.unwrap();
        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.overview.as_deref(), Some("A heist"));
        assert_eq!(movie.genres.len(), 2);
    }

    #[tokio::test]
    async fn test_update_returns_ratings_and_average() {
        let (service, repo) = setup(Arc::new(RecordingCache::new())).await;
        service
            .create_movie(CreateMovieRequest::new(7, "Heat"))
            .await
            .unwrap();
        let user = User::new("a", "a@example.com", "hash");
        repo.create_user(&user).await.unwrap();
        repo.create_rating(&Rating::new(user.id, 7, RatingValue::new(8.5).unwrap()))
            .await
            .unwrap();

        let update = UpdateMovieRequest {
            title: Some("Heat (1995)".to_string()),
            ..Default::default()
        };
        let movie = service.update_movie(7, update).await.unwrap();

        assert_eq!(movie.title, "Heat (1995)");
        assert_eq!(movie.ratings.len(), 1);
        assert_eq!(movie.average_rating, 8.5);
    }

    #[tokio::test]
    async fn test_update_with_empty_genres_keeps_existing() {
        let (service, _) = setup(Arc::new(RecordingCache::new())).await;
        service
            .create_movie(CreateMovieRequest::new(7, "Heat").with_genre_ids([3]))
            .await
            .unwrap();

        let update = UpdateMovieRequest {
            genre_ids: Some(vec![]),
            ..Default::default()
        };
        let movie = service.update_movie(7, update).await.unwrap();

        assert_eq!(movie.genres, vec![Genre::new(3, "Drama")]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_movie() {
        let (service, _) = setup(Arc::new(RecordingCache::new())).await;

        assert_eq!(
            service.update_movie(9, UpdateMovieRequest::default()).await,
            Err(ServiceError::not_found("Movie", 9))
        );
        assert_eq!(
            service.delete_movie(9).await,
            Err(ServiceError::not_found("Movie", 9))
        );
    }

    #[tokio::test]
    async fn test_create_genre_drops_cached_catalog() {
        let cache = Arc::new(RecordingCache::new());
        let (service, _) = setup(cache.clone()).await;
        assert_eq!(service.list_genres().await.unwrap().len(), 3);

        service.create_genre(Genre::new(4, "Animation")).await.unwrap();

        let names: Vec<String> = service
            .list_genres()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Action", "Animation", "Comedy", "Drama"]);
    }

    #[tokio::test]
    async fn test_cache_outage_does_not_fail_reads_or_writes() {
        let repo = InMemoryRepository::new();
        repo.create_genre(&Genre::new(1, "Action")).await.unwrap();
        let service = CatalogService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            CacheAccessor::new(Arc::new(FailingCache)),
        );

        service
            .create_movie(CreateMovieRequest::new(42, "X").with_genre_ids([1]))
            .await
            .unwrap();

        assert_eq!(service.get_movie(42).await.unwrap().title, "X");
        assert_eq!(service.list_movies(&MovieFilter::default()).await.unwrap().total, 1);
        assert_eq!(service.list_genres().await.unwrap().len(), 1);
        service.delete_movie(42).await.unwrap();
    }

    #[test]
    fn test_invalidation_strategy_from_str() {
        assert_eq!(
            "pattern".parse::<InvalidationStrategy>(),
            Ok(InvalidationStrategy::ListingPattern)
        );
        assert_eq!(
            "RESET".parse::<InvalidationStrategy>(),
            Ok(InvalidationStrategy::FullReset)
        );
        assert!("never".parse::<InvalidationStrategy>().is_err());
    }
}
