//! In-memory storage backend.
//!
//! Stores every table in a `HashMap` behind `Arc<RwLock<_>>` and enforces the
//! same uniqueness, foreign key and cascade rules as the SQLite schema, so
//! services behave identically on either backend.
//!
//! ```rust,ignore
//! use marquee::storage::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
