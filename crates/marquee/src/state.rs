//! Application state: the services wired to the configured backends.
//!
//! Storage and cache are picked at startup from [`Config`]. Cargo features
//! only decide which backends are compiled in; asking for one that is not
//! fails here.

use std::sync::Arc;

use marquee_core::cache::Cache;
use marquee_core::storage::CatalogStore;

use crate::cache::{CacheAccessor, MemoryCache};
use crate::config::{CacheBackend, Config, StorageBackend};
use crate::service::{CatalogService, RatingService, UserService, WatchlistService};
use crate::storage::InMemoryRepository;

/// Shared application state.
///
/// Cheap to clone; every service shares the same repository and cache.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub ratings: RatingService,
    pub watchlist: WatchlistService,
    pub users: UserService,
}

impl AppState {
    /// Creates the state for the backends named in `config`.
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let cache = build_cache(config).await?;

        match config.storage_backend {
            StorageBackend::Memory => Ok(Self::build(InMemoryRepository::new(), cache, config)),
            StorageBackend::Sqlite => sqlite_state(config, cache).await,
        }
    }

    /// Wires every service to one repository and one cache.
    pub fn build<R>(repo: R, cache: Arc<dyn Cache>, config: &Config) -> Self
    where
        R: CatalogStore + 'static,
    {
        let repo = Arc::new(repo);
        let cache = CacheAccessor::new(cache);

        Self {
            catalog: CatalogService::new(repo.clone(), repo.clone(), cache)
                .with_ttls(config.cache_ttls())
                .with_invalidation(config.invalidation),
            ratings: RatingService::new(repo.clone(), repo.clone(), repo.clone()),
            watchlist: WatchlistService::new(repo.clone(), repo.clone(), repo.clone()),
            users: UserService::new(repo),
        }
    }
}

#[cfg(feature = "sqlite")]
async fn sqlite_state(config: &Config, cache: Arc<dyn Cache>) -> Result<AppState, anyhow::Error> {
    let repo = crate::storage::SqliteRepository::new(&config.sqlite_path).await?;
    tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
    Ok(AppState::build(repo, cache, config))
}

#[cfg(not(feature = "sqlite"))]
async fn sqlite_state(_config: &Config, _cache: Arc<dyn Cache>) -> Result<AppState, anyhow::Error> {
    anyhow::bail!("SQLite storage requested but the `sqlite` feature is not enabled")
}

async fn build_cache(config: &Config) -> Result<Arc<dyn Cache>, anyhow::Error> {
    match config.cache_backend {
        CacheBackend::Memory => {
            tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");
            Ok(Arc::new(MemoryCache::new(config.cache_max_entries)))
        }
        #[cfg(feature = "redis")]
        CacheBackend::Redis => {
            let cache = crate::cache::RedisCache::new(&config.redis_url).await?;
            tracing::info!(url = %config.redis_url, "Using Redis cache");
            Ok(Arc::new(cache))
        }
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis => {
            anyhow::bail!("Redis cache requested but the `redis` feature is not enabled")
        }
    }
}
