//! SQLite storage backend implementation.
//!
//! Uses `rusqlite` for synchronous access, wrapped with `tokio-rusqlite` so
//! every statement runs on the connection's own thread.

mod conversions;
mod error;
mod query;
mod repository;
mod schema;

pub use repository::SqliteRepository;
