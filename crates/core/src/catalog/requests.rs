use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::operations::page_offset;

/// Default page size for movie listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Column a movie listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    ReleaseDate,
    VoteAverage,
    #[default]
    Popularity,
}

impl SortField {
    /// Returns the wire name of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::ReleaseDate => "releaseDate",
            SortField::VoteAverage => "voteAverage",
            SortField::Popularity => "popularity",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "releaseDate" | "release-date" | "release_date" => Ok(SortField::ReleaseDate),
            "voteAverage" | "vote-average" | "vote_average" => Ok(SortField::VoteAverage),
            "popularity" => Ok(SortField::Popularity),
            other => Err(format!(
                "Invalid sort field '{other}': \
                 expected title, releaseDate, voteAverage or popularity"
            )),
        }
    }
}

/// Direction of a movie listing sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Returns true for ascending order.
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("Invalid sort order '{other}': expected asc or desc")),
        }
    }
}

/// Filter, sort and pagination parameters for a movie listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieFilter {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Case-insensitive title substring.
    pub search: Option<String>,
    /// A movie matches when it has at least one of these genres.
    pub genre_ids: Vec<i64>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for MovieFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: None,
            genre_ids: Vec::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl MovieFilter {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_genre_ids(mut self, genre_ids: impl IntoIterator<Item = i64>) -> Self {
        self.genre_ids = genre_ids.into_iter().collect();
        self
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    /// Returns the canonical form of this filter.
    ///
    /// Page and limit are raised to at least 1, a blank search is dropped and
    /// genre ids are sorted and de-duplicated, so two filters that select the
    /// same rows compare (and serialize) equal.
    pub fn normalized(&self) -> Self {
        let mut genre_ids = self.genre_ids.clone();
        genre_ids.sort_unstable();
        genre_ids.dedup();

        Self {
            page: self.page.max(1),
            limit: self.limit.max(1),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            genre_ids,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }

    /// Number of rows to skip for this filter's page.
    pub fn offset(&self) -> u64 {
        page_offset(self.page.max(1), self.limit.max(1))
    }
}

/// Request to add a movie to the catalog.
///
/// The id is assigned by the upstream movie provider, not generated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl CreateMovieRequest {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: None,
            vote_count: None,
            popularity: None,
            adult: None,
            original_language: None,
            original_title: None,
            genre_ids: Vec::new(),
        }
    }

    pub fn with_genre_ids(mut self, genre_ids: impl IntoIterator<Item = i64>) -> Self {
        self.genre_ids = genre_ids.into_iter().collect();
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn with_vote_average(mut self, vote_average: f64) -> Self {
        self.vote_average = Some(vote_average);
        self
    }
}

/// Partial update of a movie. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    pub adult: Option<bool>,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    /// Replaces the genre set when present and non-empty.
    pub genre_ids: Option<Vec<i64>>,
}

impl UpdateMovieRequest {
    /// Returns the genre ids that should replace the current set, if any.
    pub fn replacement_genre_ids(&self) -> Option<&[i64]> {
        self.genre_ids
            .as_deref()
            .filter(|ids| !ids.is_empty())
    }
}

/// Request to add a movie to a watchlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddToWatchlistRequest {
    pub is_favorite: bool,
}

impl AddToWatchlistRequest {
    pub fn favorite() -> Self {
        Self { is_favorite: true }
    }
}

/// Request to register a user.
///
/// Hashing the password is the caller's job; only the hash reaches the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
