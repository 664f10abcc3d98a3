use serde_json::json;

use marquee_core::catalog::RatingValue;

use super::Global;
use crate::state::AppState;

#[derive(Debug, clap::Parser)]
pub struct RatingsCommand {
    #[command(subcommand)]
    pub action: RatingsAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum RatingsAction {
    /// Rate a movie as the acting user, replacing any earlier rating
    Rate {
        movie_id: i64,

        /// 0 to 10, one decimal place
        #[arg(value_parser = parse_rating)]
        value: RatingValue,
    },

    /// Show every rating of a movie with the average
    List { movie_id: i64 },

    /// Show the acting user's rating of a movie
    Mine { movie_id: i64 },

    /// Delete the acting user's rating of a movie
    Delete { movie_id: i64 },

    /// Show every rating by the acting user
    User,
}

fn parse_rating(s: &str) -> Result<RatingValue, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    RatingValue::new(value).map_err(|e| e.to_string())
}

pub async fn run(cmd: RatingsCommand, state: &AppState, global: &Global) -> anyhow::Result<()> {
    match cmd.action {
        RatingsAction::Rate { movie_id, value } => {
            let user_id = global.require_user()?;
            global.format.print(&state.ratings.rate(user_id, movie_id, value).await?)
        }
        RatingsAction::List { movie_id } => {
            global.format.print(&state.ratings.get_movie_ratings(movie_id).await?)
        }
        RatingsAction::Mine { movie_id } => {
            let user_id = global.require_user()?;
            global
                .format
                .print(&state.ratings.get_user_rating(user_id, movie_id).await?)
        }
        RatingsAction::Delete { movie_id } => {
            let user_id = global.require_user()?;
            state.ratings.delete_rating(user_id, movie_id).await?;
            global.format.print(&json!({ "deleted": true, "movieId": movie_id }))
        }
        RatingsAction::User => {
            let user_id = global.require_user()?;
            global.format.print(&state.ratings.get_user_ratings(user_id).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("7.46").unwrap().get(), 7.5);
        assert!(parse_rating("10.5").is_err());
        assert!(parse_rating("great").is_err());
    }
}
