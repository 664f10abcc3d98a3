//! Operator command line over the service boundary.
//!
//! Each subcommand maps onto one service operation and prints its result.
//! The acting user of user-scoped commands comes from `--user`.

mod genres;
mod movies;
mod output;
mod ratings;
mod users;
mod watchlist;

use anyhow::Context;
use clap::Parser;
use uuid::Uuid;

use crate::config::{CacheBackend, Config, StorageBackend};
use crate::state::AppState;

pub use output::OutputFormat;

/// Marquee - Movie catalog with ratings and watchlists
#[derive(Debug, Parser)]
#[command(name = "marquee")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// User the command acts on behalf of
    #[arg(long, global = true, value_name = "UUID", env = "MARQUEE_USER")]
    pub user: Option<Uuid>,

    /// Storage backend: sqlite or memory (overrides STORAGE_BACKEND)
    #[arg(long, global = true)]
    pub storage: Option<StorageBackend>,

    /// Cache backend: memory or redis (overrides CACHE_BACKEND)
    #[arg(long, global = true)]
    pub cache: Option<CacheBackend>,

    /// SQLite database path (overrides SQLITE_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub sqlite_path: Option<String>,

    /// Redis connection URL (overrides REDIS_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub redis_url: Option<String>,
}

impl Global {
    /// Applies command line overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(storage) = self.storage {
            config.storage_backend = storage;
        }
        if let Some(cache) = self.cache {
            config.cache_backend = cache;
        }
        if let Some(path) = &self.sqlite_path {
            config.sqlite_path = path.clone();
        }
        if let Some(url) = &self.redis_url {
            config.redis_url = url.clone();
        }
        config
    }

    /// Returns the acting user, failing when `--user` was not given.
    pub fn require_user(&self) -> anyhow::Result<Uuid> {
        self.user
            .context("this command acts on behalf of a user; pass --user <UUID>")
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Browse and add genres
    Genres(genres::GenresCommand),

    /// Browse and manage movies
    Movies(movies::MoviesCommand),

    /// Manage users
    Users(users::UsersCommand),

    /// Rate movies and read ratings
    Ratings(ratings::RatingsCommand),

    /// Manage the acting user's watchlist
    Watchlist(watchlist::WatchlistCommand),
}

/// Runs a parsed command against the application state.
pub async fn run(cli: Cli, state: &AppState) -> anyhow::Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Genres(cmd) => genres::run(cmd, state, &global).await,
        Commands::Movies(cmd) => movies::run(cmd, state, &global).await,
        Commands::Users(cmd) => users::run(cmd, state, &global).await,
        Commands::Ratings(cmd) => ratings::run(cmd, state, &global).await,
        Commands::Watchlist(cmd) => watchlist::run(cmd, state, &global).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::InvalidationStrategy;
    use marquee_core::catalog::{SortField, SortOrder};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("marquee").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_movie_listing() {
        let cli = parse(&[
            "movies", "list", "--page", "2", "--limit", "10", "--genre", "28", "--genre", "12",
            "--sort-by", "title", "--order", "asc",
        ]);

        let Commands::Movies(movies::MoviesCommand {
            action: movies::MoviesAction::List(args),
        }) = cli.command
        else {
            panic!("expected movies list");
        };
        let filter = args.filter();
        assert_eq!(filter.page, 2);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.genre_ids, vec![28, 12]);
        assert_eq!(filter.sort_by, SortField::Title);
        assert_eq!(filter.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_global_flags_anywhere() {
        let user = Uuid::new_v4().to_string();
        let cli = parse(&["watchlist", "list", "--user", &user, "--format", "json"]);

        assert_eq!(cli.global.format, OutputFormat::Json);
        assert_eq!(cli.global.require_user().unwrap().to_string(), user);
    }

    #[test]
    fn test_missing_user_is_an_error() {
        let cli = parse(&["watchlist", "favorites"]);
        assert!(cli.global.require_user().is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = parse(&[
            "genres", "list", "--storage", "memory", "--cache", "redis", "--redis-url",
            "redis://cache:6379",
        ]);
        let base = Config {
            storage_backend: StorageBackend::Sqlite,
            sqlite_path: "marquee.db".to_string(),
            cache_backend: CacheBackend::Memory,
            redis_url: "redis://localhost:6379".to_string(),
            cache_max_entries: 10,
            listing_ttl_seconds: 300,
            detail_ttl_seconds: 600,
            genres_ttl_seconds: 3600,
            invalidation: InvalidationStrategy::ListingPattern,
        };

        let config = cli.global.apply(base);

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.cache_backend, CacheBackend::Redis);
        assert_eq!(config.redis_url, "redis://cache:6379");
        assert_eq!(config.sqlite_path, "marquee.db");
    }

    #[test]
    fn test_rating_out_of_range_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["marquee", "ratings", "rate", "42", "11"]);
        assert!(result.is_err());
    }
}
