use std::{env, str::FromStr, time::Duration};

use crate::service::{CacheTtls, InvalidationStrategy};

/// Which repository implementation backs the services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" | "inmemory" => Ok(StorageBackend::Memory),
            other => Err(format!("Invalid storage backend '{other}': expected sqlite or memory")),
        }
    }
}

/// Which cache implementation the cache accessor wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            other => Err(format!("Invalid cache backend '{other}': expected memory or redis")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend (default: sqlite)
    pub storage_backend: StorageBackend,
    /// Path to SQLite database file (default: "marquee.db")
    pub sqlite_path: String,
    /// Cache backend (default: memory)
    pub cache_backend: CacheBackend,
    /// Redis connection URL (default: "redis://localhost:6379")
    pub redis_url: String,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Movie listing TTL in seconds (default: 300)
    pub listing_ttl_seconds: u64,
    /// Movie detail TTL in seconds (default: 600)
    pub detail_ttl_seconds: u64,
    /// Genre catalog TTL in seconds (default: 3600)
    pub genres_ttl_seconds: u64,
    /// Listing invalidation on movie writes (default: pattern)
    pub invalidation: InvalidationStrategy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STORAGE_BACKEND` - `sqlite` or `memory` (default: sqlite)
    /// - `SQLITE_PATH` - SQLite database path (default: "marquee.db")
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `CACHE_MAX_ENTRIES` - Maximum in-memory cache entries (default: 10,000)
    /// - `CACHE_LISTING_TTL_SECONDS` - Listing TTL (default: 300)
    /// - `CACHE_DETAIL_TTL_SECONDS` - Detail TTL (default: 600)
    /// - `CACHE_GENRES_TTL_SECONDS` - Genre catalog TTL (default: 3600)
    /// - `CACHE_INVALIDATION` - `pattern` or `reset` (default: pattern)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            storage_backend: parse_env("STORAGE_BACKEND").unwrap_or_default(),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "marquee.db".to_string()),
            cache_backend: parse_env("CACHE_BACKEND").unwrap_or_default(),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES").unwrap_or(10_000),
            listing_ttl_seconds: parse_env("CACHE_LISTING_TTL_SECONDS").unwrap_or(300),
            detail_ttl_seconds: parse_env("CACHE_DETAIL_TTL_SECONDS").unwrap_or(600),
            genres_ttl_seconds: parse_env("CACHE_GENRES_TTL_SECONDS").unwrap_or(3600),
            invalidation: parse_env("CACHE_INVALIDATION").unwrap_or_default(),
        }
    }

    /// Get cache TTLs as Durations.
    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            listing: Duration::from_secs(self.listing_ttl_seconds),
            detail: Duration::from_secs(self.detail_ttl_seconds),
            genres: Duration::from_secs(self.genres_ttl_seconds),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_ttls_conversion() {
        let config = Config {
            storage_backend: StorageBackend::Memory,
            sqlite_path: "test.db".to_string(),
            cache_backend: CacheBackend::Memory,
            redis_url: "redis://localhost:6379".to_string(),
            cache_max_entries: 100,
            listing_ttl_seconds: 30,
            detail_ttl_seconds: 60,
            genres_ttl_seconds: 90,
            invalidation: InvalidationStrategy::FullReset,
        };

        let ttls = config.cache_ttls();

        assert_eq!(ttls.listing, Duration::from_secs(30));
        assert_eq!(ttls.detail, Duration::from_secs(60));
        assert_eq!(ttls.genres, Duration::from_secs(90));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        for name in [
            "STORAGE_BACKEND",
            "SQLITE_PATH",
            "CACHE_BACKEND",
            "REDIS_URL",
            "CACHE_MAX_ENTRIES",
            "CACHE_LISTING_TTL_SECONDS",
            "CACHE_DETAIL_TTL_SECONDS",
            "CACHE_GENRES_TTL_SECONDS",
            "CACHE_INVALIDATION",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();

        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
        assert_eq!(config.sqlite_path, "marquee.db");
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_ttls(), CacheTtls::default());
        assert_eq!(config.invalidation, InvalidationStrategy::ListingPattern);
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("SQLite".parse::<StorageBackend>(), Ok(StorageBackend::Sqlite));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert_eq!("redis".parse::<CacheBackend>(), Ok(CacheBackend::Redis));
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
