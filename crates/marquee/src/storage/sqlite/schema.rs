//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
///
/// Foreign keys are off by default in SQLite, so the pragma runs first on
/// every connection.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    -- Unicode-lowercased title; SQLite's LIKE only folds ASCII.
    title_search TEXT NOT NULL,
    overview TEXT,
    poster_path TEXT,
    backdrop_path TEXT,
    release_date TEXT,
    vote_average REAL NOT NULL DEFAULT 0,
    vote_count INTEGER NOT NULL DEFAULT 0,
    popularity REAL NOT NULL DEFAULT 0,
    adult INTEGER NOT NULL DEFAULT 0,
    original_language TEXT,
    original_title TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS movie_genres (
    movie_id INTEGER NOT NULL,
    genre_id INTEGER NOT NULL,
    PRIMARY KEY (movie_id, genre_id),
    FOREIGN KEY (movie_id) REFERENCES movies(id) ON DELETE CASCADE,
    FOREIGN KEY (genre_id) REFERENCES genres(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ratings (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    movie_id INTEGER NOT NULL,
    value REAL NOT NULL CHECK (value >= 0 AND value <= 10),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (user_id, movie_id),
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (movie_id) REFERENCES movies(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS watchlist (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    movie_id INTEGER NOT NULL,
    is_favorite INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, movie_id),
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (movie_id) REFERENCES movies(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_movie_genres_genre_id ON movie_genres(genre_id);
CREATE INDEX IF NOT EXISTS idx_movies_popularity ON movies(popularity);
CREATE INDEX IF NOT EXISTS idx_ratings_movie_id ON ratings(movie_id);
CREATE INDEX IF NOT EXISTS idx_watchlist_user_id ON watchlist(user_id);
"#;

/// Movie columns in the order `row_to_movie` reads them, aliased `m`.
pub const MOVIE_COLUMNS: &str = "m.id, m.title, m.overview, m.poster_path, m.backdrop_path, \
    m.release_date, m.vote_average, m.vote_count, m.popularity, m.adult, \
    m.original_language, m.original_title, m.created_at, m.updated_at";

// Movie queries
pub const INSERT_MOVIE: &str = r#"
INSERT INTO movies (id, title, overview, poster_path, backdrop_path, release_date,
    vote_average, vote_count, popularity, adult, original_language, original_title,
    created_at, updated_at, title_search)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
"#;

pub const SELECT_MOVIE_BY_ID: &str = r#"
SELECT m.id, m.title, m.overview, m.poster_path, m.backdrop_path, m.release_date,
    m.vote_average, m.vote_count, m.popularity, m.adult, m.original_language,
    m.original_title, m.created_at, m.updated_at
FROM movies m
WHERE m.id = ?1
"#;

pub const UPDATE_MOVIE: &str = r#"
UPDATE movies
SET title = ?2, overview = ?3, poster_path = ?4, backdrop_path = ?5, release_date = ?6,
    vote_average = ?7, vote_count = ?8, popularity = ?9, adult = ?10,
    original_language = ?11, original_title = ?12, updated_at = ?13, title_search = ?14
WHERE id = ?1
"#;

pub const DELETE_MOVIE: &str = r#"
DELETE FROM movies
WHERE id = ?1
"#;

// Movie/genre association queries
pub const INSERT_MOVIE_GENRE: &str = r#"
INSERT OR IGNORE INTO movie_genres (movie_id, genre_id)
VALUES (?1, ?2)
"#;

pub const DELETE_MOVIE_GENRES: &str = r#"
DELETE FROM movie_genres
WHERE movie_id = ?1
"#;

pub const SELECT_GENRES_FOR_MOVIE: &str = r#"
SELECT g.id, g.name
FROM genres g
INNER JOIN movie_genres mg ON g.id = mg.genre_id
WHERE mg.movie_id = ?1
ORDER BY g.name ASC, g.id ASC
"#;

// Genre queries
pub const INSERT_GENRE: &str = r#"
INSERT INTO genres (id, name)
VALUES (?1, ?2)
"#;

pub const SELECT_ALL_GENRES: &str = r#"
SELECT id, name
FROM genres
ORDER BY name ASC, id ASC
"#;

pub const SELECT_GENRE_BY_ID: &str = r#"
SELECT id, name
FROM genres
WHERE id = ?1
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, username, email, password_hash, created_at, updated_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_USERNAME: &str = r#"
SELECT id, username, email, password_hash, created_at, updated_at
FROM users
WHERE username = ?1
"#;

pub const DELETE_USER: &str = r#"
DELETE FROM users
WHERE id = ?1
"#;

// Rating queries
pub const INSERT_RATING: &str = r#"
INSERT INTO ratings (id, user_id, movie_id, value, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_RATING: &str = r#"
SELECT id, user_id, movie_id, value, created_at, updated_at
FROM ratings
WHERE user_id = ?1 AND movie_id = ?2
"#;

pub const SELECT_RATINGS_BY_MOVIE: &str = r#"
SELECT id, user_id, movie_id, value, created_at, updated_at
FROM ratings
WHERE movie_id = ?1
ORDER BY created_at DESC
"#;

pub const SELECT_RATINGS_BY_USER: &str = r#"
SELECT id, user_id, movie_id, value, created_at, updated_at
FROM ratings
WHERE user_id = ?1
ORDER BY created_at DESC
"#;

pub const UPDATE_RATING: &str = r#"
UPDATE ratings
SET value = ?2, updated_at = ?3
WHERE id = ?1
"#;

pub const DELETE_RATING: &str = r#"
DELETE FROM ratings
WHERE user_id = ?1 AND movie_id = ?2
"#;

// Watchlist queries
pub const INSERT_WATCHLIST_ENTRY: &str = r#"
INSERT INTO watchlist (id, user_id, movie_id, is_favorite, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_WATCHLIST_ENTRY: &str = r#"
SELECT id, user_id, movie_id, is_favorite, created_at
FROM watchlist
WHERE user_id = ?1 AND movie_id = ?2
"#;

/// Entry columns followed by `MOVIE_COLUMNS`.
pub const SELECT_WATCHLIST_WITH_MOVIES: &str = r#"
SELECT w.id, w.user_id, w.movie_id, w.is_favorite, w.created_at,
    m.id, m.title, m.overview, m.poster_path, m.backdrop_path, m.release_date,
    m.vote_average, m.vote_count, m.popularity, m.adult, m.original_language,
    m.original_title, m.created_at, m.updated_at
FROM watchlist w
INNER JOIN movies m ON m.id = w.movie_id
WHERE w.user_id = ?1 AND (?2 = 0 OR w.is_favorite = 1)
ORDER BY w.created_at DESC
"#;

pub const UPDATE_WATCHLIST_ENTRY: &str = r#"
UPDATE watchlist
SET is_favorite = ?2
WHERE id = ?1
"#;

pub const DELETE_WATCHLIST_ENTRY: &str = r#"
DELETE FROM watchlist
WHERE user_id = ?1 AND movie_id = ?2
"#;
