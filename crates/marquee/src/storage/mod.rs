//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `marquee_core::storage`. The in-memory backend is always available; the
//! SQLite backend is behind the `sqlite` feature (enabled by default).
//! [`Config`](crate::config::Config) picks one at startup.

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
