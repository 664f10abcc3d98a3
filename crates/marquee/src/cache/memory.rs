//! In-memory cache implementation with LRU eviction.
//!
//! Thread-safe cache with lazy TTL expiry using tokio synchronization
//! primitives. Suited to single-instance deployments and tests.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use marquee_core::cache::{pattern_matches, Cache, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Expired entries are dropped when they are next read. Once `max_entries`
/// is reached the least recently used entry makes room for the new one.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` values.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock: a hit promotes the entry in the LRU order.
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        let mut store = self.store.write().await;
        let keys_to_delete: Vec<String> = store
            .iter()
            .filter(|(key, _)| pattern_matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys_to_delete {
            store.pop(key);
        }

        tracing::trace!(pattern, deleted = keys_to_delete.len(), "Deleted keys by pattern");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.store.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::cache::{
        movie_detail_key, movie_listing_key, GENRE_CATALOG_KEY, MOVIE_LISTING_PATTERN,
    };
    use marquee_core::catalog::MovieFilter;

    const TEST_MAX_ENTRIES: usize = 1000;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("movie-detail:1", b"payload", None).await.unwrap();
        let result = cache.get("movie-detail:1").await.unwrap();

        assert_eq!(result, Some(b"payload".to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("key", b"value", None).await.unwrap();
        cache.delete("key").await.unwrap();

        assert!(cache.get("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache
            .set("short", b"lived", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(cache.get("short").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get("short").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_pattern_only_touches_listing_space() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let first_page = movie_listing_key(&MovieFilter::default());
        let second_page = movie_listing_key(&MovieFilter::default().with_page(2));

        cache.set(&first_page, b"1", None).await.unwrap();
        cache.set(&second_page, b"2", None).await.unwrap();
        cache.set(&movie_detail_key(7), b"3", None).await.unwrap();
        cache.set(GENRE_CATALOG_KEY, b"4", None).await.unwrap();

        cache.delete_pattern(MOVIE_LISTING_PATTERN).await.unwrap();

        assert!(cache.get(&first_page).await.unwrap().is_none());
        assert!(cache.get(&second_page).await.unwrap().is_none());
        assert!(cache.get(&movie_detail_key(7)).await.unwrap().is_some());
        assert!(cache.get(GENRE_CATALOG_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("a", b"1", None).await.unwrap();
        cache.set("b", b"2", None).await.unwrap();
        cache.clear().await.unwrap();

        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_overwrite_value() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("key", b"first", None).await.unwrap();
        cache.set("key", b"second", None).await.unwrap();

        assert_eq!(cache.get("key").await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(3);

        cache.set("key1", b"value1", None).await.unwrap();
        cache.set("key2", b"value2", None).await.unwrap();
        cache.set("key3", b"value3", None).await.unwrap();

        // key1 becomes most recently used, so key2 is evicted next.
        cache.get("key1").await.unwrap();
        cache.set("key4", b"value4", None).await.unwrap();

        assert!(cache.get("key1").await.unwrap().is_some());
        assert!(cache.get("key2").await.unwrap().is_none());
        assert!(cache.get("key3").await.unwrap().is_some());
        assert!(cache.get("key4").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_holds_one_entry() {
        let cache = MemoryCache::new(0);

        cache.set("a", b"1", None).await.unwrap();
        cache.set("b", b"2", None).await.unwrap();

        assert_eq!(cache.len().await, 1);
        assert!(cache.get("b").await.unwrap().is_some());
    }
}
