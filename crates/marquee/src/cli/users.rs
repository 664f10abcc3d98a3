use serde_json::json;
use uuid::Uuid;

use marquee_core::catalog::CreateUserRequest;

use super::Global;
use crate::state::AppState;

#[derive(Debug, clap::Parser)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub action: UsersAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum UsersAction {
    /// Register a user
    Create {
        username: String,
        email: String,

        /// Already-hashed password
        #[arg(long, env = "MARQUEE_PASSWORD_HASH")]
        password_hash: String,
    },

    /// Show a user by id or username
    Get { user: String },

    /// Delete a user with their ratings and watchlist
    Delete { id: Uuid },
}

pub async fn run(cmd: UsersCommand, state: &AppState, global: &Global) -> anyhow::Result<()> {
    match cmd.action {
        UsersAction::Create {
            username,
            email,
            password_hash,
        } => {
            let request = CreateUserRequest {
                username,
                email,
                password_hash,
            };
            global.format.print(&state.users.create_user(request).await?)
        }
        UsersAction::Get { user } => {
            let found = match user.parse::<Uuid>() {
                Ok(id) => state.users.get_user(id).await?,
                Err(_) => state.users.get_user_by_username(&user).await?,
            };
            global.format.print(&found)
        }
        UsersAction::Delete { id } => {
            state.users.delete_user(id).await?;
            global.format.print(&json!({ "deleted": true, "userId": id }))
        }
    }
}
