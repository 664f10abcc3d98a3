mod error;
mod operations;
mod requests;
mod types;

pub use error::RatingValueError;
pub use operations::{average_rating, page_offset, round_to_one_decimal, total_pages};
pub use requests::{
    DEFAULT_PAGE_LIMIT,
    AddToWatchlistRequest, CreateMovieRequest, CreateUserRequest, MovieFilter, SortField,
    SortOrder, UpdateMovieRequest,
};
pub use types::{
    MAX_RATING,
    Genre, Movie, MoviePage, MovieRatings, Rating, RatingValue, User, WatchlistEntry,
};
