//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use marquee_core::catalog::{Genre, Movie, Rating, RatingValue, User, WatchlistEntry};

/// Convert a SQLite row to a Genre.
///
/// Expected columns: id, name
pub fn row_to_genre(row: &Row) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Convert a SQLite row to a Movie without associations.
///
/// Expected columns: `MOVIE_COLUMNS`, starting at `offset`.
pub fn row_to_movie_at(row: &Row, offset: usize) -> rusqlite::Result<Movie> {
    let release_date: Option<String> = row.get(offset + 5)?;
    let created_at: String = row.get(offset + 12)?;
    let updated_at: String = row.get(offset + 13)?;

    Ok(Movie {
        id: row.get(offset)?,
        title: row.get(offset + 1)?,
        overview: row.get(offset + 2)?,
        poster_path: row.get(offset + 3)?,
        backdrop_path: row.get(offset + 4)?,
        release_date: release_date
            .as_deref()
            .map(|s| parse_date(s, offset + 5))
            .transpose()?,
        vote_average: row.get(offset + 6)?,
        vote_count: row.get(offset + 7)?,
        popularity: row.get(offset + 8)?,
        adult: row.get(offset + 9)?,
        original_language: row.get(offset + 10)?,
        original_title: row.get(offset + 11)?,
        genres: Vec::new(),
        ratings: Vec::new(),
        average_rating: 0.0,
        created_at: parse_datetime(&created_at, offset + 12)?,
        updated_at: parse_datetime(&updated_at, offset + 13)?,
    })
}

pub fn row_to_movie(row: &Row) -> rusqlite::Result<Movie> {
    row_to_movie_at(row, 0)
}

/// Convert a SQLite row to a User.
///
/// Expected columns: id, username, email, password_hash, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(User {
        id: parse_uuid(&id, 0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(&created_at, 4)?,
        updated_at: parse_datetime(&updated_at, 5)?,
    })
}

/// Convert a SQLite row to a Rating.
///
/// Expected columns: id, user_id, movie_id, value, created_at, updated_at
pub fn row_to_rating(row: &Row) -> rusqlite::Result<Rating> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let value: f64 = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(Rating {
        id: parse_uuid(&id, 0)?,
        user_id: parse_uuid(&user_id, 1)?,
        movie_id: row.get(2)?,
        value: RatingValue::new(value)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Real, Box::new(e)))?,
        created_at: parse_datetime(&created_at, 4)?,
        updated_at: parse_datetime(&updated_at, 5)?,
    })
}

/// Convert a SQLite row to a WatchlistEntry without its movie.
///
/// Expected columns: id, user_id, movie_id, is_favorite, created_at
pub fn row_to_watchlist_entry(row: &Row) -> rusqlite::Result<WatchlistEntry> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let created_at: String = row.get(4)?;

    Ok(WatchlistEntry {
        id: parse_uuid(&id, 0)?,
        user_id: parse_uuid(&user_id, 1)?,
        movie_id: row.get(2)?,
        is_favorite: row.get(3)?,
        created_at: parse_datetime(&created_at, 4)?,
        movie: None,
    })
}

/// Convert a joined watchlist/movie row.
///
/// Expected columns: the five entry columns, then `MOVIE_COLUMNS`.
pub fn row_to_watchlist_entry_with_movie(row: &Row) -> rusqlite::Result<WatchlistEntry> {
    let mut entry = row_to_watchlist_entry(row)?;
    entry.movie = Some(row_to_movie_at(row, 5)?);
    Ok(entry)
}

fn parse_uuid(s: &str, column: usize) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Parse a date from ISO 8601 string (YYYY-MM-DD).
fn parse_date(s: &str, column: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Format a DateTime for SQLite storage.
///
/// Fixed-width nanosecond precision so text order equals time order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Format a NaiveDate for SQLite storage (YYYY-MM-DD).
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
