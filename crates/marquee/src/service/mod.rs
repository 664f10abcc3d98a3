//! The service boundary: catalog queries, ratings, watchlists and users.
//!
//! Every service holds repository trait objects; only the catalog service
//! reads through the cache.

mod catalog;
mod ratings;
mod users;
mod watchlist;

pub use catalog::{CacheTtls, CatalogService, InvalidationStrategy};
pub use ratings::RatingService;
pub use users::UserService;
pub use watchlist::WatchlistService;
