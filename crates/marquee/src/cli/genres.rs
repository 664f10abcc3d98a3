use marquee_core::catalog::Genre;

use super::Global;
use crate::state::AppState;

#[derive(Debug, clap::Parser)]
pub struct GenresCommand {
    #[command(subcommand)]
    pub action: GenresAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum GenresAction {
    /// List every genre by name
    List,

    /// Add a genre with a provider-assigned id
    Add {
        id: i64,
        name: String,
    },
}

pub async fn run(cmd: GenresCommand, state: &AppState, global: &Global) -> anyhow::Result<()> {
    match cmd.action {
        GenresAction::List => global.format.print(&state.catalog.list_genres().await?),
        GenresAction::Add { id, name } => {
            let genre = state.catalog.create_genre(Genre::new(id, name)).await?;
            global.format.print(&genre)
        }
    }
}
