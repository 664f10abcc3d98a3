mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::{
    CatalogStore, GenreRepository, MovieRepository, RatingRepository, UserRepository,
    WatchlistRepository,
};
pub use types::MovieRelations;
