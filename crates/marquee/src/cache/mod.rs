//! Cache backends and the fail-soft accessor the services read through.
//!
//! The in-memory LRU backend is always compiled. The Redis backend is behind
//! the `redis` feature; which one is used is decided at startup from
//! [`Config`](crate::config::Config).

mod accessor;
mod memory;

#[cfg(feature = "redis")]
mod redis_impl;

#[cfg(test)]
pub(crate) mod testing;

pub use accessor::CacheAccessor;
pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
