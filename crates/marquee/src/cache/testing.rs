//! Cache doubles shared by the accessor and service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use marquee_core::cache::{Cache, CacheError, Result};

use super::MemoryCache;

/// Cache whose every operation fails as if the server were down.
pub struct FailingCache;

#[async_trait]
impl Cache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn delete_pattern(&self, _pattern: &str) -> Result<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn clear(&self) -> Result<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }
}

/// Working in-memory cache that also records what was asked of it.
pub struct RecordingCache {
    inner: MemoryCache,
    hits: AtomicUsize,
    misses: AtomicUsize,
    clears: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    patterns: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryCache::new(1000),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
            patterns: Mutex::new(Vec::new()),
        }
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn miss_count(&self) -> usize {
        self.misses.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub async fn keys_deleted(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }

    pub async fn patterns_deleted(&self) -> Vec<String> {
        self.patterns.lock().await.clone()
    }

    pub async fn contains(&self, key: &str) -> bool {
        matches!(self.inner.get(key).await, Ok(Some(_)))
    }
}

#[async_trait]
impl Cache for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.inner.get(key).await?;
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        } else {
            self.misses.fetch_add(1, Ordering::SeqCst);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.deleted.lock().await.push(key.to_string());
        self.inner.delete(key).await
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        self.patterns.lock().await.push(pattern.to_string());
        self.inner.delete_pattern(pattern).await
    }

    async fn clear(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear().await
    }
}
