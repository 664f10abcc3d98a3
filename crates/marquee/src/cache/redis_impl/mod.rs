//! Redis cache backend implementation.
//!
//! Shares the cache between several `marquee` processes.

mod cache;
mod error;

pub use cache::RedisCache;
