use serde_json::json;

use marquee_core::catalog::AddToWatchlistRequest;

use super::Global;
use crate::state::AppState;

#[derive(Debug, clap::Parser)]
pub struct WatchlistCommand {
    #[command(subcommand)]
    pub action: WatchlistAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum WatchlistAction {
    /// Add a movie to the acting user's watchlist
    Add {
        movie_id: i64,

        /// Mark the entry as a favorite
        #[arg(long)]
        favorite: bool,
    },

    /// List the watchlist, newest first
    List {
        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Remove a movie from the watchlist
    Remove { movie_id: i64 },

    /// Flip the favorite flag of an entry
    Toggle { movie_id: i64 },

    /// Check whether a movie is on the watchlist
    Check { movie_id: i64 },

    /// List favorites only
    Favorites,
}

pub async fn run(cmd: WatchlistCommand, state: &AppState, global: &Global) -> anyhow::Result<()> {
    let user_id = global.require_user()?;

    match cmd.action {
        WatchlistAction::Add { movie_id, favorite } => {
            let request = AddToWatchlistRequest {
                is_favorite: favorite,
            };
            global
                .format
                .print(&state.watchlist.add(user_id, movie_id, request).await?)
        }
        WatchlistAction::List { favorites } => {
            global.format.print(&state.watchlist.list(user_id, favorites).await?)
        }
        WatchlistAction::Remove { movie_id } => {
            state.watchlist.remove(user_id, movie_id).await?;
            global.format.print(&json!({ "removed": true, "movieId": movie_id }))
        }
        WatchlistAction::Toggle { movie_id } => global
            .format
            .print(&state.watchlist.toggle_favorite(user_id, movie_id).await?),
        WatchlistAction::Check { movie_id } => {
            let is_member = state.watchlist.is_member(user_id, movie_id).await?;
            global
                .format
                .print(&json!({ "movieId": movie_id, "isMember": is_member }))
        }
        WatchlistAction::Favorites => {
            global.format.print(&state.watchlist.list_favorites(user_id).await?)
        }
    }
}
