//! Glob matching for cache keys.
//!
//! Only `*` is special: it matches any run of characters, including none.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use marquee_core::cache::pattern_matches;
///
/// assert!(pattern_matches("movie-detail:42", "movie-detail:42"));
/// assert!(pattern_matches("movie-listing:*", "movie-listing:{\"page\":1}"));
/// assert!(pattern_matches("movie-*:42", "movie-detail:42"));
/// assert!(!pattern_matches("movie-listing:*", "movie-detail:42"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern = pattern.as_bytes();
    let key = key.as_bytes();

    let (mut p, mut k) = (0, 0);
    // Position of the last `*` seen and the key index it was tried against.
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, k));
            p += 1;
        } else if p < pattern.len() && pattern[p] == key[k] {
            p += 1;
            k += 1;
        } else if let Some((star, tried)) = backtrack {
            // Let the last `*` swallow one more byte and retry.
            p = star + 1;
            k = tried + 1;
            backtrack = Some((star, tried + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}
