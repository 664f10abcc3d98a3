use std::time::Duration;

use crate::catalog::MovieFilter;

/// Prefix shared by every movie listing key.
pub const MOVIE_LISTING_PREFIX: &str = "movie-listing:";

/// Pattern covering the whole listing cache space.
pub const MOVIE_LISTING_PATTERN: &str = "movie-listing:*";

/// Fixed key of the cached genre catalog.
pub const GENRE_CATALOG_KEY: &str = "genre-catalog";

/// Redis set holding every live listing key, so the listing space can be
/// swept without `SCAN`. Deliberately outside `MOVIE_LISTING_PATTERN`.
pub const LISTING_TRACKING_KEY: &str = "_keys:movie-listing";

pub const LISTING_TTL: Duration = Duration::from_secs(300);
pub const DETAIL_TTL: Duration = Duration::from_secs(600);
pub const GENRE_CATALOG_TTL: Duration = Duration::from_secs(3600);

/// Returns the cache key for a movie listing.
///
/// The key embeds the JSON form of the normalized filter. Struct fields
/// serialize in declaration order, so equal filters always yield equal keys.
pub fn movie_listing_key(filter: &MovieFilter) -> String {
    let normalized = filter.normalized();
    match serde_json::to_string(&normalized) {
        Ok(json) => format!("{MOVIE_LISTING_PREFIX}{json}"),
        Err(_) => format!("{MOVIE_LISTING_PREFIX}{normalized:?}"),
    }
}

/// Returns the cache key for a single movie's detail view.
pub fn movie_detail_key(movie_id: i64) -> String {
    format!("movie-detail:{}", movie_id)
}

/// Checks if a cache key belongs to the listing cache space.
pub fn is_movie_listing_key(key: &str) -> bool {
    key.starts_with(MOVIE_LISTING_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::pattern_matches;
    use crate::catalog::{SortField, SortOrder};

    #[test]
    fn test_movie_detail_key() {
        assert_eq!(movie_detail_key(42), "movie-detail:42");
    }

    #[test]
    fn test_movie_listing_key_default_filter() {
        let key = movie_listing_key(&MovieFilter::default());
        assert_eq!(
            key,
            r#"movie-listing:{"page":1,"limit":20,"search":null,"genreIds":[],"sortBy":"popularity","sortOrder":"DESC"}"#
        );
    }

    #[test]
    fn test_equivalent_filters_share_a_key() {
        let a = MovieFilter::default().with_genre_ids([28, 12]);
        let b = MovieFilter::default().with_genre_ids([12, 28, 12]);
        assert_eq!(movie_listing_key(&a), movie_listing_key(&b));
    }

    #[test]
    fn test_distinct_filters_get_distinct_keys() {
        let a = MovieFilter::default().with_page(1);
        let b = MovieFilter::default().with_page(2);
        let c = MovieFilter::default().sorted_by(SortField::Title, SortOrder::Asc);
        assert_ne!(movie_listing_key(&a), movie_listing_key(&b));
        assert_ne!(movie_listing_key(&a), movie_listing_key(&c));
    }

    #[test]
    fn test_listing_pattern_covers_listing_keys_only() {
        let listing = movie_listing_key(&MovieFilter::default().with_search("alien"));
        assert!(pattern_matches(MOVIE_LISTING_PATTERN, &listing));
        assert!(is_movie_listing_key(&listing));

        assert!(!pattern_matches(MOVIE_LISTING_PATTERN, &movie_detail_key(1)));
        assert!(!pattern_matches(MOVIE_LISTING_PATTERN, GENRE_CATALOG_KEY));
        assert!(!pattern_matches(MOVIE_LISTING_PATTERN, LISTING_TRACKING_KEY));
        assert!(!is_movie_listing_key(LISTING_TRACKING_KEY));
    }

    #[test]
    fn test_ttls() {
        assert_eq!(LISTING_TTL.as_secs(), 300);
        assert_eq!(DETAIL_TTL.as_secs(), 600);
        assert_eq!(GENRE_CATALOG_TTL.as_secs(), 3600);
    }
}
