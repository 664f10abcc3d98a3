//! Fail-soft typed access to a [`Cache`] backend.
//!
//! Every read that fails, for whatever reason, is a miss. Every write that
//! fails is a no-op. Failures are logged at `warn` and never returned, so a
//! cache outage cannot fail a request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use marquee_core::cache::{deserialize_value, serialize_value, Cache};

/// Typed, fail-soft front for a shared cache backend.
#[derive(Clone)]
pub struct CacheAccessor {
    cache: Arc<dyn Cache>,
}

impl CacheAccessor {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Returns the cached value for `key`, or `None` on miss or failure.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize_value(&bytes) {
                Ok(value) => {
                    tracing::trace!(key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "Cached value could not be decoded");
                    None
                }
            },
            Ok(None) => {
                tracing::trace!(key, "Cache miss");
                None
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache read failed");
                None
            }
        }
    }

    /// Stores `value` under `key`.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>)
    where
        T: Serialize + Sync + ?Sized,
    {
        let bytes = match serialize_value(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key, error = %err, "Value could not be encoded for caching");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, &bytes, ttl).await {
            tracing::warn!(key, error = %err, "Cache write failed");
        }
    }

    pub async fn delete(&self, key: &str) {
        if let Err(err) = self.cache.delete(key).await {
            tracing::warn!(key, error = %err, "Cache delete failed");
        }
    }

    /// Deletes every key matching a glob pattern.
    pub async fn invalidate_pattern(&self, pattern: &str) {
        match self.cache.delete_pattern(pattern).await {
            Ok(()) => tracing::info!(pattern, "Invalidated cache keys"),
            Err(err) => tracing::warn!(pattern, error = %err, "Cache pattern delete failed"),
        }
    }

    /// Drops every cached entry.
    pub async fn reset_all(&self) {
        match self.cache.clear().await {
            Ok(()) => tracing::info!("Cache reset"),
            Err(err) => tracing::warn!(error = %err, "Cache reset failed"),
        }
    }

    /// Returns the cached value for `key`, or runs `producer` and caches its
    /// result.
    ///
    /// `producer` runs at most once, and never on a hit. Its error is the only
    /// one this method returns; a failed cache write still yields the value.
    pub async fn get_or_populate<T, E, F, Fut>(
        &self,
        key: &str,
        producer: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = producer().await?;
        self.set(key, &value, ttl).await;
        Ok(value)
    }
}
