//! Redis cache implementation.
//!
//! Listing keys are recorded in a Redis set (`LISTING_TRACKING_KEY`) when
//! they are written, so sweeping the listing space reads one set instead of
//! running `SCAN` over the keyspace.
//!
//! A listing write stores the value, records the key and refreshes the
//! tracking set's expiry in one `MULTI`/`EXEC`, so a live listing key is
//! always tracked. The set expires with the newest listing it tracks; listing
//! keys share one TTL, so every tracked key is gone before the set is.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use marquee_core::cache::{
    is_movie_listing_key, pattern_matches, Cache, CacheError, Result, LISTING_TRACKING_KEY,
    MOVIE_LISTING_PREFIX,
};

use super::error::map_redis_error;

/// Builds the atomic write of `key`, including its tracking entry when it is
/// a listing key.
fn write_pipeline(key: &str, value: &[u8], ttl: Option<Duration>) -> redis::Pipeline {
    let seconds = ttl.map(|duration| duration.as_secs().max(1));
    let mut pipe = redis::pipe();
    pipe.atomic();

    match seconds {
        Some(seconds) => pipe.set_ex(key, value, seconds).ignore(),
        None => pipe.set(key, value).ignore(),
    };

    if is_movie_listing_key(key) {
        pipe.sadd(LISTING_TRACKING_KEY, key).ignore();
        match seconds {
            Some(seconds) => pipe
                .expire(LISTING_TRACKING_KEY, i64::try_from(seconds).unwrap_or(i64::MAX))
                .ignore(),
            None => pipe.persist(LISTING_TRACKING_KEY).ignore(),
        };
    }

    pipe
}

/// Redis cache backend using a connection manager.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis at `url` (e.g., "redis://localhost:6379").
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = write_pipeline(key, value, ttl)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        if is_movie_listing_key(key) {
            conn.srem::<_, _, ()>(LISTING_TRACKING_KEY, key)
                .await
                .map_err(map_redis_error)?;
        }

        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        // Only listing keys are tracked; anything else would need SCAN.
        if !pattern.starts_with(MOVIE_LISTING_PREFIX) {
            return Err(CacheError::OperationFailed(format!(
                "Pattern '{pattern}' is outside the tracked listing space"
            )));
        }

        let mut conn = self.conn.clone();
        let tracked_keys: Vec<String> = conn
            .smembers(LISTING_TRACKING_KEY)
            .await
            .map_err(map_redis_error)?;

        let keys_to_delete: Vec<&String> = tracked_keys
            .iter()
            .filter(|k| pattern_matches(pattern, k))
            .collect();

        if !keys_to_delete.is_empty() {
            let _: () = redis::pipe()
                .atomic()
                .del(&keys_to_delete)
                .ignore()
                .srem(LISTING_TRACKING_KEY, &keys_to_delete)
                .ignore()
                .query_async(&mut conn)
                .await
                .map_err(map_redis_error)?;
        }

        tracing::trace!(pattern, deleted = keys_to_delete.len(), "Deleted keys by pattern");

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}
