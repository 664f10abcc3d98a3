//! SQLite repository implementation.
//!
//! Implements the repository traits from `marquee_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use marquee_core::catalog::{Genre, Movie, MovieFilter, Rating, User, WatchlistEntry};
use marquee_core::storage::{
    GenreRepository, MovieRelations, MovieRepository, RatingRepository, RepositoryError, Result,
    UserRepository, WatchlistRepository,
};

use super::conversions::{
    format_date, format_datetime, row_to_genre, row_to_movie, row_to_rating, row_to_user,
    row_to_watchlist_entry, row_to_watchlist_entry_with_movie,
};
use super::error::map_tokio_rusqlite_error;
use super::query::{build_count_query, build_page_query};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Runs a single-row query, mapping "no rows" to `None`.
fn query_optional<T, P: rusqlite::Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    map: impl FnOnce(&rusqlite::Row) -> rusqlite::Result<T>,
) -> std::result::Result<Option<T>, tokio_rusqlite::Error> {
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    match stmt.query_row(params, map) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(wrap_err(e)),
    }
}

fn query_all<T, P: rusqlite::Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    map: impl FnMut(&rusqlite::Row) -> rusqlite::Result<T>,
) -> std::result::Result<Vec<T>, tokio_rusqlite::Error> {
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    let rows = stmt.query_map(params, map).map_err(wrap_err)?;

    let mut items = Vec::new();
    for row_result in rows {
        items.push(row_result.map_err(wrap_err)?);
    }
    Ok(items)
}

/// Attaches the requested associations to a movie loaded from its row.
fn load_relations(
    conn: &rusqlite::Connection,
    movie: &mut Movie,
    relations: MovieRelations,
) -> std::result::Result<(), tokio_rusqlite::Error> {
    if relations.genres {
        movie.genres = query_all(conn, schema::SELECT_GENRES_FOR_MOVIE, [movie.id], row_to_genre)?;
    }
    if relations.ratings {
        movie.ratings =
            query_all(conn, schema::SELECT_RATINGS_BY_MOVIE, [movie.id], row_to_rating)?;
    }
    Ok(())
}

/// Owned column values of a movie row, ready to move into a closure.
struct MovieParams {
    id: i64,
    title: String,
    title_search: String,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    vote_average: f64,
    vote_count: i64,
    popularity: f64,
    adult: bool,
    original_language: Option<String>,
    original_title: Option<String>,
    created_at: String,
    updated_at: String,
    genre_ids: Vec<i64>,
}

impl From<&Movie> for MovieParams {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            title_search: movie.title.to_lowercase(),
            overview: movie.overview.clone(),
            poster_path: movie.poster_path.clone(),
            backdrop_path: movie.backdrop_path.clone(),
            release_date: movie.release_date.as_ref().map(format_date),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            adult: movie.adult,
            original_language: movie.original_language.clone(),
            original_title: movie.original_title.clone(),
            created_at: format_datetime(&movie.created_at),
            updated_at: format_datetime(&movie.updated_at),
            genre_ids: movie.genres.iter().map(|g| g.id).collect(),
        }
    }
}

fn insert_movie_genres(
    tx: &rusqlite::Transaction<'_>,
    movie_id: i64,
    genre_ids: &[i64],
) -> std::result::Result<(), tokio_rusqlite::Error> {
    let mut stmt = tx.prepare(schema::INSERT_MOVIE_GENRE).map_err(wrap_err)?;
    for genre_id in genre_ids {
        stmt.execute(rusqlite::params![movie_id, genre_id])
            .map_err(wrap_err)?;
    }
    Ok(())
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// MovieRepository implementation
// ============================================================================

#[async_trait]
impl MovieRepository for SqliteRepository {
    async fn get_movie(&self, id: i64, relations: MovieRelations) -> Result<Option<Movie>> {
        self.conn
            .call(move |conn| {
                let Some(mut movie) =
                    query_optional(conn, schema::SELECT_MOVIE_BY_ID, [id], row_to_movie)?
                else {
                    return Ok(None);
                };
                load_relations(conn, &mut movie, relations)?;
                Ok(Some(movie))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Movie", id.to_string()))
    }

    async fn list_movies(
        &self,
        filter: &MovieFilter,
        relations: MovieRelations,
    ) -> Result<(Vec<Movie>, u64)> {
        let count_query = build_count_query(filter);
        let page_query = build_page_query(filter);

        self.conn
            .call(move |conn| {
                let total: i64 = conn
                    .query_row(
                        &count_query.sql,
                        rusqlite::params_from_iter(count_query.params.iter()),
                        |row| row.get(0),
                    )
                    .map_err(wrap_err)?;

                let mut movies = query_all(
                    conn,
                    &page_query.sql,
                    rusqlite::params_from_iter(page_query.params.iter()),
                    row_to_movie,
                )?;
                for movie in &mut movies {
                    load_relations(conn, movie, relations)?;
                }

                Ok((movies, u64::try_from(total).unwrap_or(0)))
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_movie(&self, movie: &Movie) -> Result<()> {
        let p = MovieParams::from(movie);
        let movie_id = movie.id;

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_MOVIE,
                    rusqlite::params![
                        p.id,
                        p.title,
                        p.overview,
                        p.poster_path,
                        p.backdrop_path,
                        p.release_date,
                        p.vote_average,
                        p.vote_count,
                        p.popularity,
                        p.adult,
                        p.original_language,
                        p.original_title,
                        p.created_at,
                        p.updated_at,
                        p.title_search
                    ],
                )
                .map_err(wrap_err)?;
                insert_movie_genres(&tx, p.id, &p.genre_ids)?;
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Movie", movie_id.to_string()))
    }

    async fn update_movie(&self, movie: &Movie) -> Result<()> {
        let p = MovieParams::from(movie);
        let movie_id = movie.id;

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let rows = tx
                    .execute(
                        schema::UPDATE_MOVIE,
                        rusqlite::params![
                            p.id,
                            p.title,
                            p.overview,
                            p.poster_path,
                            p.backdrop_path,
                            p.release_date,
                            p.vote_average,
                            p.vote_count,
                            p.popularity,
                            p.adult,
                            p.original_language,
                            p.original_title,
                            p.updated_at,
                            p.title_search
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }

                tx.execute(schema::DELETE_MOVIE_GENRES, [p.id])
                    .map_err(wrap_err)?;
                insert_movie_genres(&tx, p.id, &p.genre_ids)?;
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Movie", movie_id.to_string()))
    }

    async fn delete_movie(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_MOVIE, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Movie", id.to_string()))
    }
}

// ============================================================================
// GenreRepository implementation
// ============================================================================

#[async_trait]
impl GenreRepository for SqliteRepository {
    async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.conn
            .call(|conn| query_all(conn, schema::SELECT_ALL_GENRES, [], row_to_genre))
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn get_genres_by_ids(&self, ids: &[i64]) -> Result<Vec<Genre>> {
        let ids = ids.to_vec();

        self.conn
            .call(move |conn| {
                let mut genres = Vec::new();
                for id in ids {
                    if let Some(genre) =
                        query_optional(conn, schema::SELECT_GENRE_BY_ID, [id], row_to_genre)?
                    {
                        if !genres.contains(&genre) {
                            genres.push(genre);
                        }
                    }
                }
                genres.sort_by(|a: &Genre, b: &Genre| {
                    a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
                });
                Ok(genres)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_genre(&self, genre: &Genre) -> Result<()> {
        let id = genre.id;
        let name = genre.name.clone();

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_GENRE, rusqlite::params![id, name])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Genre", id.to_string()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_USER_BY_ID, [&id_str], row_to_user)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id.to_string()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        let username_for_error = username.clone();

        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_USER_BY_USERNAME, [&username], row_to_user)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", username_for_error))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let username = user.username.clone();
        let email = user.email.clone();
        let password_hash = user.password_hash.clone();
        let created_at = format_datetime(&user.created_at);
        let updated_at = format_datetime(&user.updated_at);
        let user_id = user.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![id, username, email, password_hash, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user_id))
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_USER, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id.to_string()))
    }
}

// ============================================================================
// RatingRepository implementation
// ============================================================================

#[async_trait]
impl RatingRepository for SqliteRepository {
    async fn get_rating(&self, user_id: Uuid, movie_id: i64) -> Result<Option<Rating>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_RATING,
                    rusqlite::params![user_id_str, movie_id],
                    row_to_rating,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Rating", format!("{user_id}/{movie_id}")))
    }

    async fn get_ratings_by_movie(&self, movie_id: i64) -> Result<Vec<Rating>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_RATINGS_BY_MOVIE, [movie_id], row_to_rating)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn get_ratings_by_user(&self, user_id: Uuid) -> Result<Vec<Rating>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_RATINGS_BY_USER, [&user_id_str], row_to_rating)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_rating(&self, rating: &Rating) -> Result<()> {
        let id = rating.id.to_string();
        let user_id = rating.user_id.to_string();
        let movie_id = rating.movie_id;
        let value = rating.value.get();
        let created_at = format_datetime(&rating.created_at);
        let updated_at = format_datetime(&rating.updated_at);
        let pair = format!("{}/{}", rating.user_id, rating.movie_id);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_RATING,
                    rusqlite::params![id, user_id, movie_id, value, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Rating", pair))
    }

    async fn update_rating(&self, rating: &Rating) -> Result<()> {
        let id = rating.id.to_string();
        let value = rating.value.get();
        let updated_at = format_datetime(&rating.updated_at);
        let rating_id = rating.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_RATING, rusqlite::params![id, value, updated_at])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Rating", rating_id))
    }

    async fn delete_rating(&self, user_id: Uuid, movie_id: i64) -> Result<()> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_RATING, rusqlite::params![user_id_str, movie_id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Rating", format!("{user_id}/{movie_id}")))
    }
}

// ============================================================================
// WatchlistRepository implementation
// ============================================================================

#[async_trait]
impl WatchlistRepository for SqliteRepository {
    async fn get_watchlist_entry(
        &self,
        user_id: Uuid,
        movie_id: i64,
    ) -> Result<Option<WatchlistEntry>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_WATCHLIST_ENTRY,
                    rusqlite::params![user_id_str, movie_id],
                    row_to_watchlist_entry,
                )
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error(e, "WatchlistEntry", format!("{user_id}/{movie_id}"))
            })
    }

    async fn get_watchlist(
        &self,
        user_id: Uuid,
        favorites_only: bool,
    ) -> Result<Vec<WatchlistEntry>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut entries = query_all(
                    conn,
                    schema::SELECT_WATCHLIST_WITH_MOVIES,
                    rusqlite::params![user_id_str, favorites_only],
                    row_to_watchlist_entry_with_movie,
                )?;
                for entry in &mut entries {
                    if let Some(movie) = entry.movie.as_mut() {
                        load_relations(conn, movie, MovieRelations::GENRES)?;
                    }
                }
                Ok(entries)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_watchlist_entry(&self, entry: &WatchlistEntry) -> Result<()> {
        let id = entry.id.to_string();
        let user_id = entry.user_id.to_string();
        let movie_id = entry.movie_id;
        let is_favorite = entry.is_favorite;
        let created_at = format_datetime(&entry.created_at);
        let pair = format!("{}/{}", entry.user_id, entry.movie_id);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_WATCHLIST_ENTRY,
                    rusqlite::params![id, user_id, movie_id, is_favorite, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "WatchlistEntry", pair))
    }

    async fn update_watchlist_entry(&self, entry: &WatchlistEntry) -> Result<()> {
        let id = entry.id.to_string();
        let is_favorite = entry.is_favorite;
        let entry_id = entry.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_WATCHLIST_ENTRY,
                        rusqlite::params![id, is_favorite],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "WatchlistEntry", entry_id))
    }

    async fn delete_watchlist_entry(&self, user_id: Uuid, movie_id: i64) -> Result<()> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::DELETE_WATCHLIST_ENTRY,
                        rusqlite::params![user_id_str, movie_id],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error(e, "WatchlistEntry", format!("{user_id}/{movie_id}"))
            })
    }
}
