use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::RatingValueError;
use super::operations::{average_rating, round_to_one_decimal, total_pages};
use super::requests::{CreateMovieRequest, UpdateMovieRequest};

/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 10.0;

/// A movie genre. Ids come from the upstream movie provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

impl Genre {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A movie in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// Provider-supplied vote average, unrelated to local ratings.
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub adult: bool,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Only populated when ratings were requested from storage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<Rating>,
    /// Mean of `ratings`, computed at read time and never persisted.
    #[serde(default)]
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Creates a movie with the given provider id and title.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            adult: false,
            original_language: None,
            original_title: None,
            genres: Vec::new(),
            ratings: Vec::new(),
            average_rating: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a movie from a create request and the genres its ids resolved to.
    pub fn from_request(request: CreateMovieRequest, genres: Vec<Genre>) -> Self {
        let mut movie = Movie::new(request.id, request.title);
        movie.overview = request.overview;
        movie.poster_path = request.poster_path;
        movie.backdrop_path = request.backdrop_path;
        movie.release_date = request.release_date;
        movie.vote_average = request.vote_average.unwrap_or(0.0);
        movie.vote_count = request.vote_count.unwrap_or(0);
        movie.popularity = request.popularity.unwrap_or(0.0);
        movie.adult = request.adult.unwrap_or(false);
        movie.original_language = request.original_language;
        movie.original_title = request.original_title;
        movie.genres = genres;
        movie
    }

    /// Merges the supplied fields of `update` into this movie.
    ///
    /// `genres` replaces the genre set when `Some`; the caller resolves it
    /// from [`UpdateMovieRequest::replacement_genre_ids`].
    pub fn apply_update(mut self, update: UpdateMovieRequest, genres: Option<Vec<Genre>>) -> Self {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(overview) = update.overview {
            self.overview = Some(overview);
        }
        if let Some(poster_path) = update.poster_path {
            self.poster_path = Some(poster_path);
        }
        if let Some(backdrop_path) = update.backdrop_path {
            self.backdrop_path = Some(backdrop_path);
        }
        if let Some(release_date) = update.release_date {
            self.release_date = Some(release_date);
        }
        if let Some(vote_average) = update.vote_average {
            self.vote_average = vote_average;
        }
        if let Some(vote_count) = update.vote_count {
            self.vote_count = vote_count;
        }
        if let Some(popularity) = update.popularity {
            self.popularity = popularity;
        }
        if let Some(adult) = update.adult {
            self.adult = adult;
        }
        if let Some(original_language) = update.original_language {
            self.original_language = Some(original_language);
        }
        if let Some(original_title) = update.original_title {
            self.original_title = Some(original_title);
        }
        if let Some(genres) = genres {
            self.genres = genres;
        }
        self.updated_at = Utc::now();
        self
    }

    /// Recomputes `average_rating` from the loaded ratings.
    pub fn with_average_rating(mut self) -> Self {
        self.average_rating = average_rating(self.ratings.iter().map(|r| r.value.get()));
        self
    }

    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Returns true if the movie carries the given genre.
    pub fn has_genre(&self, genre_id: i64) -> bool {
        self.genres.iter().any(|g| g.id == genre_id)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// A rating on the 0-10 scale with one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RatingValue(f64);

impl RatingValue {
    /// Validates `value` and rounds it to one decimal place.
    pub fn new(value: f64) -> Result<Self, RatingValueError> {
        if value.is_nan() {
            return Err(RatingValueError::NotANumber);
        }
        if !(0.0..=MAX_RATING).contains(&value) {
            return Err(RatingValueError::OutOfRange(value));
        }
        Ok(Self(round_to_one_decimal(value)))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for RatingValue {
    type Error = RatingValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        RatingValue::new(value)
    }
}

impl From<RatingValue> for f64 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A user's rating of a movie. At most one exists per (user, movie) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: i64,
    pub value: RatingValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(user_id: Uuid, movie_id: i64, value: RatingValue) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            movie_id,
            value,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the value and bumps `updated_at`.
    pub fn with_value(mut self, value: RatingValue) -> Self {
        self.value = value;
        self.updated_at = Utc::now();
        self
    }
}

/// A movie on a user's watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: i64,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    /// Present when the entry was loaded together with its movie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<Movie>,
}

impl WatchlistEntry {
    pub fn new(user_id: Uuid, movie_id: i64, is_favorite: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            movie_id,
            is_favorite,
            created_at: Utc::now(),
            movie: None,
        }
    }

    /// Returns a copy with the favorite flag flipped.
    pub fn toggled(mut self) -> Self {
        self.is_favorite = !self.is_favorite;
        self
    }
}

/// All ratings of one movie and their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRatings {
    pub movie_id: i64,
    pub average_rating: f64,
    pub total_ratings: usize,
    pub ratings: Vec<Rating>,
}

impl MovieRatings {
    pub fn from_ratings(movie_id: i64, ratings: Vec<Rating>) -> Self {
        Self {
            movie_id,
            average_rating: average_rating(ratings.iter().map(|r| r.value.get())),
            total_ratings: ratings.len(),
            ratings,
        }
    }
}

/// One page of a movie listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub items: Vec<Movie>,
    /// Number of movies matching the filter across all pages.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl MoviePage {
    pub fn new(items: Vec<Movie>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            items,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(value: f64) -> Rating {
        Rating::new(Uuid::new_v4(), 1, RatingValue::new(value).unwrap())
    }

    #[test]
    fn test_rating_value_rounds_to_one_decimal() {
        assert_eq!(RatingValue::new(7.46).unwrap().get(), 7.5);
        assert_eq!(RatingValue::new(0.0).unwrap().get(), 0.0);
        assert_eq!(RatingValue::new(10.0).unwrap().get(), 10.0);
    }

    #[test]
    fn test_rating_value_rejects_out_of_range() {
        assert_eq!(
            RatingValue::new(10.5),
            Err(RatingValueError::OutOfRange(10.5))
        );
        assert_eq!(
            RatingValue::new(-0.1),
            Err(RatingValueError::OutOfRange(-0.1))
        );
        assert_eq!(RatingValue::new(f64::NAN), Err(RatingValueError::NotANumber));
    }

    #[test]
    fn test_rating_value_deserialize_validates() {
        let value: RatingValue = serde_json::from_str("8.5").unwrap();
        assert_eq!(value.get(), 8.5);
        assert!(serde_json::from_str::<RatingValue>("11").is_err());
    }

    #[test]
    fn test_rating_value_display() {
        assert_eq!(RatingValue::new(7.0).unwrap().to_string(), "7.0");
    }

    #[test]
    fn test_movie_from_request() {
        let request = CreateMovieRequest::new(42, "X")
            .with_popularity(12.5)
            .with_genre_ids([1]);
        let movie = Movie::from_request(request, vec![Genre::new(1, "Action")]);

        assert_eq!(movie.id, 42);
        assert_eq!(movie.title, "X");
        assert_eq!(movie.popularity, 12.5);
        assert_eq!(movie.vote_count, 0);
        assert!(!movie.adult);
        assert_eq!(movie.genres, vec![Genre::new(1, "Action")]);
        assert_eq!(movie.average_rating, 0.0);
    }

    #[test]
    fn test_apply_update_merges_only_supplied_fields() {
        let movie = Movie::new(1, "Old")
            .with_popularity(3.0)
            .with_genres(vec![Genre::new(1, "Action")]);
        let update = UpdateMovieRequest {
            title: Some("New".to_string()),
            ..Default::default()
        };

        let updated = movie.apply_update(update, None);

        assert_eq!(updated.title, "New");
        assert_eq!(updated.popularity, 3.0);
        assert_eq!(updated.genres, vec![Genre::new(1, "Action")]);
    }

    #[test]
    fn test_apply_update_replaces_genres() {
        let movie = Movie::new(1, "Film").with_genres(vec![Genre::new(1, "Action")]);
        let updated = movie.apply_update(
            UpdateMovieRequest::default(),
            Some(vec![Genre::new(35, "Comedy")]),
        );
        assert_eq!(updated.genres, vec![Genre::new(35, "Comedy")]);
    }

    #[test]
    fn test_with_average_rating() {
        let mut movie = Movie::new(1, "Film");
        movie.ratings = vec![rating(8.0), rating(7.0), rating(7.0)];
        assert_eq!(movie.with_average_rating().average_rating, 7.3);

        let movie = Movie::new(2, "Unrated").with_average_rating();
        assert_eq!(movie.average_rating, 0.0);
    }

    #[test]
    fn test_movie_serializes_camel_case_without_empty_ratings() {
        let movie = Movie::new(1, "Film");
        let json = serde_json::to_value(&movie).unwrap();
        assert!(json.get("averageRating").is_some());
        assert!(json.get("voteAverage").is_some());
        assert!(json.get("ratings").is_none());
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = User::new("alice", "alice@example.com", "secret-hash");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_watchlist_toggle_is_self_inverse() {
        let entry = WatchlistEntry::new(Uuid::new_v4(), 1, false);
        let toggled = entry.clone().toggled();
        assert!(toggled.is_favorite);
        assert_eq!(toggled.toggled().is_favorite, entry.is_favorite);
    }

    #[test]
    fn test_movie_ratings_from_ratings() {
        let summary = MovieRatings::from_ratings(1, vec![rating(9.0), rating(8.5)]);
        assert_eq!(summary.total_ratings, 2);
        assert_eq!(summary.average_rating, 8.8);

        let empty = MovieRatings::from_ratings(1, Vec::new());
        assert_eq!(empty.total_ratings, 0);
        assert_eq!(empty.average_rating, 0.0);
    }

    #[test]
    fn test_movie_page_total_pages() {
        let page = MoviePage::new(Vec::new(), 25, 2, 10);
        assert_eq!(page.total_pages, 3);
    }
}
