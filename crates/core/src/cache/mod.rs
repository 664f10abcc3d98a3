mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    is_movie_listing_key, movie_detail_key, movie_listing_key, DETAIL_TTL, GENRE_CATALOG_KEY,
    GENRE_CATALOG_TTL, LISTING_TRACKING_KEY, LISTING_TTL, MOVIE_LISTING_PATTERN,
    MOVIE_LISTING_PREFIX,
};
pub use patterns::pattern_matches;
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use traits::Cache;
